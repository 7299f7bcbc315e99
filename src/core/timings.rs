use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fraction of the call duration attributed to prompt processing.
pub const PROMPT_TIME_RATIO: f64 = 0.1;
/// Fraction of the call duration attributed to token generation.
pub const PREDICTED_TIME_RATIO: f64 = 0.9;

/// Heuristic timing estimate attached to every completion result.
///
/// The completion API reports token counts but no timing signal, so the
/// measured wall-clock duration is split 10%/90% between prompt processing
/// and generation. Rates derived from a zero token count stay null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    pub prompt_n: Option<u64>,
    pub prompt_ms: Option<f64>,
    pub prompt_per_token_ms: Option<f64>,
    pub prompt_per_second: Option<f64>,
    pub predicted_n: Option<u64>,
    pub predicted_ms: Option<f64>,
    pub predicted_per_token_ms: Option<f64>,
    pub predicted_per_second: Option<f64>,
}

impl Timings {
    /// All-null timings, used for error artifacts.
    pub fn null() -> Self {
        Self {
            prompt_n: None,
            prompt_ms: None,
            prompt_per_token_ms: None,
            prompt_per_second: None,
            predicted_n: None,
            predicted_ms: None,
            predicted_per_token_ms: None,
            predicted_per_second: None,
        }
    }

    /// Derive estimates from the measured call duration and the token counts
    /// reported under `usage`.
    pub fn derive(elapsed: Duration, prompt_n: u64, predicted_n: u64) -> Self {
        let duration = elapsed.as_secs_f64();
        let prompt_time = duration * PROMPT_TIME_RATIO;
        let predicted_time = duration * PREDICTED_TIME_RATIO;

        Self {
            prompt_n: Some(prompt_n),
            prompt_ms: Some(round_to(prompt_time * 1000.0, 3)),
            prompt_per_token_ms: per_token_ms(prompt_time, prompt_n),
            prompt_per_second: per_second(prompt_time, prompt_n),
            predicted_n: Some(predicted_n),
            predicted_ms: Some(round_to(predicted_time * 1000.0, 3)),
            predicted_per_token_ms: per_token_ms(predicted_time, predicted_n),
            predicted_per_second: per_second(predicted_time, predicted_n),
        }
    }
}

fn per_token_ms(time_s: f64, tokens: u64) -> Option<f64> {
    if tokens == 0 {
        return None;
    }
    Some(round_to(time_s * 1000.0 / tokens as f64, 9))
}

fn per_second(time_s: f64, tokens: u64) -> Option<f64> {
    if tokens == 0 || time_s == 0.0 {
        return None;
    }
    Some(round_to(tokens as f64 / time_s, 9))
}

/// Round to `digits` decimal places, half away from zero.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_fixed_duration_split() {
        let timings = Timings::derive(Duration::from_secs(2), 100, 900);

        // 10% of 2s as ms, 90% of 2s as ms
        assert_eq!(timings.prompt_ms, Some(200.0));
        assert_eq!(timings.predicted_ms, Some(1800.0));
        assert_eq!(timings.prompt_n, Some(100));
        assert_eq!(timings.predicted_n, Some(900));
        assert_eq!(timings.prompt_per_token_ms, Some(2.0));
        assert_eq!(timings.predicted_per_token_ms, Some(2.0));
        assert_eq!(timings.prompt_per_second, Some(500.0));
        assert_eq!(timings.predicted_per_second, Some(500.0));
    }

    #[test]
    fn test_zero_token_counts_yield_nulls() {
        let timings = Timings::derive(Duration::from_secs(1), 0, 0);

        assert_eq!(timings.prompt_n, Some(0));
        assert_eq!(timings.predicted_n, Some(0));
        assert!(timings.prompt_ms.is_some());
        assert!(timings.predicted_ms.is_some());
        assert_eq!(timings.prompt_per_token_ms, None);
        assert_eq!(timings.prompt_per_second, None);
        assert_eq!(timings.predicted_per_token_ms, None);
        assert_eq!(timings.predicted_per_second, None);
    }

    #[test]
    fn test_zero_duration_yields_null_rates() {
        let timings = Timings::derive(Duration::ZERO, 10, 10);

        assert_eq!(timings.prompt_ms, Some(0.0));
        assert_eq!(timings.predicted_ms, Some(0.0));
        assert_eq!(timings.prompt_per_second, None);
        assert_eq!(timings.predicted_per_second, None);
    }

    #[test]
    fn test_rounding_precision() {
        // 1s / 3 tokens: ms values round to 3 places, rates to 9 places
        let timings = Timings::derive(Duration::from_secs(1), 3, 7);

        assert_eq!(timings.prompt_ms, Some(100.0));
        assert_eq!(timings.prompt_per_token_ms, Some(33.333333333));
        assert_eq!(timings.prompt_per_second, Some(30.0));
        assert_eq!(timings.predicted_per_token_ms, Some(128.571428571));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456789012, 9), 1.23456789);
        assert_eq!(round_to(123.4567891, 3), 123.457);
        assert_eq!(round_to(0.0005, 3), 0.001);
    }

    #[test]
    fn test_null_serializes_to_json_nulls() {
        let value = serde_json::to_value(Timings::null()).unwrap();
        let map = value.as_object().unwrap();

        assert_eq!(map.len(), 8);
        assert!(map.values().all(|v| *v == Value::Null));
    }
}
