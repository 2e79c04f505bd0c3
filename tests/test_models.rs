//! Tests for the three regressors on a noiseless linear signal

use pricefit::model::{
    evaluate, BoostingParams, Design, ForestParams, GradientBoosting, LinearRegression, Model,
    ModelKind, RandomForest, Regressor,
};

#[path = "common/mod.rs"]
mod common;

fn designs() -> (Design, Design) {
    let splits = common::create_linear_splits(400);
    (
        Design::from_frame(&splits.train).unwrap(),
        Design::from_frame(&splits.test).unwrap(),
    )
}

fn test_r2(model: &mut dyn Regressor) -> f64 {
    let (train, test) = designs();
    model.fit(&train.x, &train.y).unwrap();
    let pred = model.predict(&test.x).unwrap();
    evaluate(&test.y, &pred).unwrap().r2
}

#[test]
fn test_linear_regression_recovers_signal() {
    let (train, _) = designs();
    let mut model = LinearRegression::new();
    model.fit(&train.x, &train.y).unwrap();

    common::assert_close(model.coefficients[0], 3.0, 1e-6);
    common::assert_close(model.coefficients[1], -2.0, 1e-6);
    common::assert_close(model.coefficients[2], 0.5, 1e-6);
    common::assert_close(model.intercept, 10.0, 1e-5);
    assert!(model.feature_importances().is_none());

    assert!(test_r2(&mut LinearRegression::new()) > 0.999_999);
}

#[test]
fn test_random_forest_fits_signal() {
    let params = ForestParams {
        n_estimators: 30,
        ..ForestParams::default()
    };
    let mut forest = RandomForest::new(params);
    assert!(test_r2(&mut forest) > 0.9);

    let importances = forest.feature_importances().unwrap();
    assert_eq!(importances.len(), 3);
    common::assert_close(importances.iter().sum::<f64>(), 1.0, 1e-9);
    // x0 carries the largest coefficient range
    assert!(importances[0] > importances[2]);
}

#[test]
fn test_random_forest_is_deterministic_for_a_seed() {
    let (train, test) = designs();
    let params = ForestParams {
        n_estimators: 10,
        ..ForestParams::default()
    };

    let mut a = RandomForest::new(params.clone());
    let mut b = RandomForest::new(params);
    a.fit(&train.x, &train.y).unwrap();
    b.fit(&train.x, &train.y).unwrap();

    assert_eq!(a.predict(&test.x).unwrap(), b.predict(&test.x).unwrap());
}

#[test]
fn test_gradient_boosting_fits_signal() {
    let mut boosting = GradientBoosting::new(BoostingParams::default());
    assert!(test_r2(&mut boosting) > 0.95);

    assert_eq!(boosting.trees.len(), 100);
    assert!(boosting.trees.iter().all(|t| t.depth() <= 3));
    let importances = boosting.feature_importances().unwrap();
    common::assert_close(importances.iter().sum::<f64>(), 1.0, 1e-9);
}

#[test]
fn test_predict_before_fit_fails() {
    let (_, test) = designs();
    for kind in ModelKind::ALL {
        let model = kind.build(&ForestParams::default(), &BoostingParams::default());
        assert!(model.predict(&test.x).is_err(), "{} predicted unfitted", kind);
    }
}

#[test]
fn test_predict_rejects_wrong_width() {
    let (train, _) = designs();
    let mut model = LinearRegression::new();
    model.fit(&train.x, &train.y).unwrap();

    let narrow = faer::Mat::<f64>::zeros(4, 2);
    assert!(model.predict(&narrow).is_err());
}

#[test]
fn test_model_json_round_trip_predicts_identically() {
    let (train, test) = designs();
    let mut model = ModelKind::GradientBoosting.build(
        &ForestParams::default(),
        &BoostingParams {
            n_estimators: 20,
            ..BoostingParams::default()
        },
    );
    model.fit(&train.x, &train.y).unwrap();

    let json = serde_json::to_string(&model).unwrap();
    let restored: Model = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.kind(), ModelKind::GradientBoosting);
    let before = model.predict(&test.x).unwrap();
    let after = restored.predict(&test.x).unwrap();
    for (a, b) in before.iter().zip(&after) {
        common::assert_close(*b, *a, 1e-9 * a.abs().max(1.0));
    }
}
