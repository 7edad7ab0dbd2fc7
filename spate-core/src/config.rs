//! Configuration types for injection plans
//!
//! A plan is the deserialized form of a run's arrival policy: an ordered
//! list of tagged steps plus a master seed. Building a plan validates
//! every step eagerly and hands back [`InjectionProfile`] values; nothing
//! lazy can fail later. Reading the document (file, CLI, API) is the
//! caller's business — this module starts at serde.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::injection::{chain, InjectionProfile, Schedule};
use crate::seed::{components, derive_seed};

/// One step of an injection plan, tagged by profile kind.
///
/// Durations use humantime syntax ("30s", "5m"). Poisson steps may carry
/// an explicit seed; without one, the seed derives from the plan's master
/// seed and the step's position, so two runs of the same plan replay the
/// same arrivals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepConfig {
    AtOnce {
        users: u64,
    },
    NothingFor {
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
    Ramp {
        users: u64,
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
    ConstantRate {
        rate: f64,
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
    RampRate {
        start_rate: f64,
        end_rate: f64,
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
    Heaviside {
        users: u64,
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
    Poisson {
        start_rate: f64,
        end_rate: f64,
        #[serde(with = "humantime_serde")]
        duration: Duration,
        seed: Option<u64>,
    },
    Split {
        possible_users: u64,
        step: Box<StepConfig>,
        separator: Box<StepConfig>,
    },
}

impl StepConfig {
    /// Validate and build the profile for this step.
    ///
    /// `label` locates the step inside the plan ("2", "3/step", ...) for
    /// error messages and seed derivation.
    fn build(&self, master_seed: u64, label: &str) -> Result<InjectionProfile> {
        let located = |err: Error| match err {
            Error::Config(msg) => Error::Config(format!("step {label}: {msg}")),
            other => other,
        };
        match self {
            StepConfig::AtOnce { users } => Ok(InjectionProfile::at_once(*users)),
            StepConfig::NothingFor { duration } => {
                Ok(InjectionProfile::nothing_for(*duration))
            }
            StepConfig::Ramp { users, duration } => {
                Ok(InjectionProfile::ramp(*users, *duration))
            }
            StepConfig::ConstantRate { rate, duration } => {
                InjectionProfile::constant_rate(*rate, *duration).map_err(located)
            }
            StepConfig::RampRate { start_rate, end_rate, duration } => {
                InjectionProfile::ramp_rate(*start_rate, *end_rate, *duration).map_err(located)
            }
            StepConfig::Heaviside { users, duration } => {
                Ok(InjectionProfile::heaviside(*users, *duration))
            }
            StepConfig::Poisson { start_rate, end_rate, duration, seed } => {
                let seed = seed.unwrap_or_else(|| {
                    let component = format!("{}/{}", components::POISSON_ARRIVALS, label);
                    derive_seed(master_seed, &component)
                });
                InjectionProfile::poisson(*duration, *start_rate, *end_rate, seed)
                    .map_err(located)
            }
            StepConfig::Split { possible_users, step, separator } => {
                let step = step.build(master_seed, &format!("{label}/step"))?;
                let separator = separator.build(master_seed, &format!("{label}/separator"))?;
                InjectionProfile::split(*possible_users, step, separator).map_err(located)
            }
        }
    }
}

/// A full injection plan: ordered steps plus the master seed feeding any
/// stochastic step that lacks an explicit one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InjectionPlan {
    pub steps: Vec<StepConfig>,
    #[serde(default)]
    pub seed: u64,
}

impl InjectionPlan {
    /// Validate every step and build its profile, in plan order.
    pub fn build(&self) -> Result<Vec<InjectionProfile>> {
        let profiles = self
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| step.build(self.seed, &index.to_string()))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            steps = profiles.len(),
            users = profiles.iter().map(InjectionProfile::total_users).sum::<u64>(),
            "built injection plan"
        );
        Ok(profiles)
    }

    /// The run's complete arrival timeline: every step chained in order.
    pub fn schedule(&self) -> Result<Schedule> {
        Ok(chain(&self.build()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_deserializes_and_builds() {
        let plan: InjectionPlan = serde_json::from_str(
            r#"{
                "seed": 7,
                "steps": [
                    { "type": "atonce", "users": 10 },
                    { "type": "nothingfor", "duration": "5s" },
                    { "type": "ramp", "users": 100, "duration": "10s" },
                    { "type": "constantrate", "rate": 2.0, "duration": "30s" },
                    { "type": "ramprate", "start_rate": 1.0, "end_rate": 5.0, "duration": "1m" },
                    { "type": "heaviside", "users": 50, "duration": "20s" },
                    { "type": "poisson", "start_rate": 1.0, "end_rate": 2.0, "duration": "10s" }
                ]
            }"#,
        )
        .expect("plan should deserialize");

        let profiles = plan.build().expect("plan should validate");
        assert_eq!(profiles.len(), 7);
        assert_eq!(profiles[0].total_users(), 10);
        assert_eq!(profiles[2].total_users(), 100);
        assert_eq!(profiles[3].total_users(), 60);
        assert_eq!(profiles[4].total_users(), 180);
    }

    #[test]
    fn test_derived_poisson_seed_is_stable() {
        let doc = r#"{
            "seed": 42,
            "steps": [
                { "type": "poisson", "start_rate": 3.0, "end_rate": 9.0, "duration": "30s" }
            ]
        }"#;
        let plan: InjectionPlan = serde_json::from_str(doc).unwrap();
        let a: Vec<_> = plan.schedule().unwrap().collect();
        let b: Vec<_> = plan.schedule().unwrap().collect();
        assert_eq!(a, b, "same master seed must replay the same plan");
        assert!(!a.is_empty());
    }

    #[test]
    fn test_distinct_poisson_steps_get_distinct_streams() {
        let doc = r#"{
            "seed": 42,
            "steps": [
                { "type": "poisson", "start_rate": 5.0, "end_rate": 5.0, "duration": "30s" },
                { "type": "poisson", "start_rate": 5.0, "end_rate": 5.0, "duration": "30s" }
            ]
        }"#;
        let plan: InjectionPlan = serde_json::from_str(doc).unwrap();
        let profiles = plan.build().unwrap();
        let first: Vec<_> = profiles[0].schedule(Schedule::empty()).collect();
        let second: Vec<_> = profiles[1].schedule(Schedule::empty()).collect();
        assert_ne!(first, second, "identical steps must not share a random stream");
    }

    #[test]
    fn test_invalid_step_reports_position() {
        let doc = r#"{
            "steps": [
                { "type": "atonce", "users": 1 },
                { "type": "constantrate", "rate": -2.0, "duration": "10s" }
            ]
        }"#;
        let plan: InjectionPlan = serde_json::from_str(doc).unwrap();
        let err = plan.build().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("step 1"), "error should locate the step: {msg}");
    }

    #[test]
    fn test_nested_split_config() {
        let doc = r#"{
            "steps": [
                {
                    "type": "split",
                    "possible_users": 10,
                    "step": { "type": "atonce", "users": 3 },
                    "separator": { "type": "nothingfor", "duration": "1s" }
                }
            ]
        }"#;
        let plan: InjectionPlan = serde_json::from_str(doc).unwrap();
        let profiles = plan.build().unwrap();
        assert_eq!(profiles[0].total_users(), 9);
    }

    #[test]
    fn test_explicit_poisson_seed_wins() {
        let with_seed = |master: u64| -> Vec<Duration> {
            let plan = InjectionPlan {
                seed: master,
                steps: vec![StepConfig::Poisson {
                    start_rate: 4.0,
                    end_rate: 4.0,
                    duration: Duration::from_secs(20),
                    seed: Some(1234),
                }],
            };
            plan.schedule().unwrap().collect()
        };
        assert_eq!(with_seed(1), with_seed(2), "explicit seed must ignore the master seed");
    }
}
