//! Latency, token and cost accounting for answers

use std::time::Duration;

use crate::config::LlmConfig;
use crate::providers::TokenUsage;

/// Per-1000-token prices of the generation provider
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl Pricing {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            input_per_1k: config.input_cost_per_1k,
            output_per_1k: config.output_cost_per_1k,
        }
    }

    /// Cost of a call; 0.0 when the provider did not report usage
    pub fn cost(&self, usage: Option<TokenUsage>) -> f64 {
        match usage {
            Some(usage) => {
                usage.prompt_tokens as f64 / 1000.0 * self.input_per_1k
                    + usage.completion_tokens as f64 / 1000.0 * self.output_per_1k
            }
            None => 0.0,
        }
    }
}

/// Seconds rounded to two decimals
pub fn round_latency(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

/// Coarse token count: whitespace-separated words times two
pub fn token_estimate(answer: &str) -> u64 {
    answer.split_whitespace().count() as u64 * 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_latency() {
        assert_eq!(round_latency(Duration::from_millis(1234)), 1.23);
        assert_eq!(round_latency(Duration::from_millis(1236)), 1.24);
        assert_eq!(round_latency(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_token_estimate() {
        assert_eq!(token_estimate("Paris is the capital [1]."), 10);
        assert_eq!(token_estimate("  "), 0);
    }

    #[test]
    fn test_cost() {
        let pricing = Pricing {
            input_per_1k: 0.5,
            output_per_1k: 2.0,
        };
        let usage = TokenUsage {
            prompt_tokens: 2000,
            completion_tokens: 500,
        };
        assert_eq!(pricing.cost(Some(usage)), 2.0);
        assert_eq!(pricing.cost(None), 0.0);
        assert_eq!(Pricing::default().cost(Some(usage)), 0.0);
    }
}
