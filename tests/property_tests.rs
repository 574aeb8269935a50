//! Property-based tests for lags, quarter arithmetic and the forecast engine.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated tables and coefficients.

use gdp_var::core::{
    ForecastState, PeriodWindow, Quarter, TimeSeriesTable, TimeSeriesTableBuilder, Variable,
};
use gdp_var::models::var::{
    EquationSpec, Estimator, FittedModel, ForecastEngine, VarModel,
};
use gdp_var::transform::{lag, FeatureBuilder};
use proptest::prelude::*;

fn quarter(ordinal: i64) -> Quarter {
    Quarter::new(1950, 1).unwrap().offset(ordinal)
}

/// Strictly increasing periods with occasional gaps, plus values.
fn gappy_series_strategy() -> impl Strategy<Value = (Vec<Quarter>, Vec<Option<f64>>)> {
    prop::collection::vec((1i64..3, prop::option::weighted(0.9, -10.0..10.0_f64)), 5..60).prop_map(
        |steps| {
            let mut ordinal = 0;
            let mut periods = Vec::with_capacity(steps.len());
            let mut values = Vec::with_capacity(steps.len());
            for (step, value) in steps {
                ordinal += step;
                periods.push(quarter(ordinal));
                values.push(value);
            }
            (periods, values)
        },
    )
}

/// Positive raw levels with bounded quarterly log changes.
fn raw_table_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = TimeSeriesTable> {
    (min_len..max_len).prop_flat_map(|len| {
        (
            prop::collection::vec(-0.03..0.05_f64, len),
            prop::collection::vec(-0.01..0.03_f64, len),
        )
            .prop_map(move |(g, c)| {
                let mut gdp = Vec::with_capacity(len);
                let mut cpi = Vec::with_capacity(len);
                let (mut lg, mut lc) = (7.0_f64, 3.0_f64);
                for (dg, dc) in g.iter().zip(c.iter()) {
                    lg += dg;
                    lc += dc;
                    gdp.push(lg.exp());
                    cpi.push(lc.exp());
                }
                TimeSeriesTableBuilder::new()
                    .periods((0..len as i64).map(quarter).collect())
                    .observed("gdp", gdp)
                    .observed("cpi", cpi)
                    .build()
                    .unwrap()
            })
    })
}

/// Model with small random coefficients on all eight lags.
fn model_strategy() -> impl Strategy<Value = VarModel> {
    (
        -1.0..1.0_f64,
        prop::collection::vec(-0.3..0.3_f64, 8),
        -1.0..1.0_f64,
        prop::collection::vec(-0.3..0.3_f64, 8),
    )
        .prop_map(|(g0, g, i0, i)| {
            let build = |variable: Variable, intercept: f64, coefs: Vec<f64>| {
                let regressors = EquationSpec::var_equation(variable, 4).regressors;
                FittedModel::from_coefficients(
                    variable,
                    intercept,
                    regressors.into_iter().zip(coefs).collect(),
                )
                .unwrap()
            };
            VarModel::new(
                build(Variable::Gdp, g0, g),
                build(Variable::Inflation, i0, i),
            )
            .unwrap()
        })
}

// =============================================================================
// Property: lags are defined by period distance
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn lag_reads_value_k_quarters_earlier(
        (periods, values) in gappy_series_strategy(),
        k in 1usize..6
    ) {
        let lagged = lag(&periods, &values, k);
        prop_assert_eq!(lagged.len(), values.len());
        for (i, period) in periods.iter().enumerate() {
            let earlier = period.offset(-(k as i64));
            let expected = periods
                .binary_search(&earlier)
                .ok()
                .and_then(|j| values[j]);
            prop_assert_eq!(lagged[i], expected);
        }
    }

    #[test]
    fn quarter_offset_round_trips(start in -400i64..400, shift in -200i64..200) {
        let period = quarter(start);
        let moved = period.offset(shift);
        prop_assert_eq!(moved.quarters_since(&period), shift);
        prop_assert_eq!(moved.offset(-shift), period);
        prop_assert_eq!(moved.to_string().parse::<Quarter>().unwrap(), moved);
    }
}

// =============================================================================
// Property: forecast path identities
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn dynamic_levels_accumulate_forecast_differences(
        table in raw_table_strategy(24, 40),
        model in model_strategy(),
        cutover_offset in 4i64..12
    ) {
        let features = FeatureBuilder::default().build(&table).unwrap();
        let start = quarter(8);
        let window = PeriodWindow::new(start, start.offset(15)).unwrap();
        let path = ForecastEngine::new(&model, window, start.offset(cutover_offset))
            .run(&features)
            .unwrap();

        prop_assert!(path.is_complete());
        let rows = path.rows();
        for pair in rows.windows(2) {
            if pair[1].state == ForecastState::Dynamic {
                for variable in Variable::ALL {
                    let prev = pair[0].point(variable);
                    let cur = pair[1].point(variable);
                    prop_assert_eq!(cur.level, prev.level + cur.diff);
                }
            }
        }
        for row in rows.iter().filter(|r| r.state == ForecastState::Actual) {
            prop_assert_eq!(Some(row.gdp.diff), features.value("dgdp", &row.period));
            prop_assert_eq!(Some(row.inflation.level), features.value("inf", &row.period));
        }
        prop_assert_eq!(
            path.dynamic_rows().count(),
            16 - cutover_offset as usize
        );
    }

    #[test]
    fn estimation_is_idempotent(table in raw_table_strategy(40, 60)) {
        let features = FeatureBuilder::default().build(&table).unwrap();
        let window = PeriodWindow::new(quarter(0), quarter(60)).unwrap();
        let estimator = Estimator::new(window, 4, 4).unwrap();

        let first = estimator.fit(&features);
        let second = estimator.fit(&features);
        prop_assert_eq!(first, second);
    }
}
