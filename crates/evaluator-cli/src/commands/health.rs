//! 포지션 건강도 명령어.
//!
//! ```bash
//! evaluator health snapshot.json
//! ```
//!
//! 스냅샷에 `weights`가 없으면 설정 파일의 `health_weights`를 사용합니다.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use evaluator_core::{AppConfig, PositionHealthInput, PositionHealthResult};
use evaluator_engine::PositionHealthScorer;

use super::read_json;

/// 스냅샷 파일의 건강도를 계산합니다.
pub fn run_health(config: &AppConfig, path: &Path) -> Result<PositionHealthResult> {
    let mut snapshot: serde_json::Value = read_json(path)?;
    if let Some(fields) = snapshot.as_object_mut() {
        if !fields.contains_key("weights") {
            fields.insert(
                "weights".to_string(),
                serde_json::to_value(&config.health_weights)?,
            );
        }
    }
    let input: PositionHealthInput = serde_json::from_value(snapshot)
        .with_context(|| format!("{} is not a valid position snapshot", path.display()))?;
    info!(side = %input.side, path = %path.display(), "Evaluating position health");

    PositionHealthScorer::new()
        .evaluate(&input)
        .with_context(|| format!("Position health evaluation failed for {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_run_health_from_file() {
        let path = write_temp(
            "snapshot.json",
            r#"{
                "side": "SHORT",
                "open_trend_sum": -1.5,
                "current_trend_sum": -2.0,
                "prediction_state": -3,
                "prediction_state_intensity": -1,
                "technical_analysis": { "15m": -1, "30m": -1, "1h": 0, "2h": 0, "4h": -2, "1d": 0 },
                "open_interest": { "opening": 5000.0, "current": 5100.0 },
                "open_interest_state": 0,
                "long_short_ratio": { "opening": 0.9, "current": 0.85 },
                "long_short_ratio_state": -1,
                "volume": { "state": 0, "direction": -1 },
                "weights": {
                    "trend_sum": 20.0, "trend_state": 15.0,
                    "ta_15m": 5.0, "ta_30m": 5.0, "ta_1h": 5.0, "ta_2h": 5.0, "ta_4h": 5.0, "ta_1d": 5.0,
                    "open_interest": 8.0, "open_interest_state": 5.0,
                    "long_short_ratio": 7.0, "long_short_ratio_state": 5.0,
                    "volume_direction": 10.0
                }
            }"#,
        );

        let result = run_health(&AppConfig::default(), &path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(result.items.len(), 13);
        assert!(result.total_hp > rust_decimal::Decimal::ZERO);
    }

    #[test]
    fn test_run_health_uses_configured_weights() {
        let path = write_temp(
            "snapshot-no-weights.json",
            r#"{
                "side": "LONG",
                "open_trend_sum": 2.0,
                "current_trend_sum": 3.0,
                "prediction_state": 0,
                "prediction_state_intensity": 0,
                "technical_analysis": { "15m": 0, "30m": 0, "1h": 0, "2h": 0, "4h": 0, "1d": 0 },
                "open_interest": { "opening": 100.0, "current": 100.0 },
                "open_interest_state": 0,
                "long_short_ratio": { "opening": 1.0, "current": 1.0 },
                "long_short_ratio_state": 0,
                "volume": { "state": 0, "direction": 1 }
            }"#,
        );

        let mut config = AppConfig::default();
        config.health_weights.trend_sum = 50.0;
        let result = run_health(&config, &path).unwrap();
        std::fs::remove_file(&path).ok();

        let trend_sum = &result.items[0];
        assert_eq!(trend_sum.max_points, dec!(50));
        assert_eq!(trend_sum.points, dec!(40));
    }

    #[test]
    fn test_run_health_missing_file() {
        let path = std::env::temp_dir().join("evaluator-does-not-exist.json");
        assert!(run_health(&AppConfig::default(), &path).is_err());
    }
}
