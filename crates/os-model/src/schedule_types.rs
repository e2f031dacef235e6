//! Which schedule type limits each schedule usage accepts.
//!
//! A usage is a (class, display name) pair such as `("People", "Activity Level")`.
//! Assigning a schedule to a usage either checks the schedule's limits or,
//! when it has none, finds or creates suitable limits and assigns them.

use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::object::ModelObject;
use crate::schedule::{Schedule, ScheduleTypeLimits};

/// Slack allowed when comparing a limits range against a usage bound.
const BOUND_TOL: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleType {
    pub class_name: &'static str,
    pub display_name: &'static str,
    pub is_continuous: bool,
    /// Empty means dimensionless.
    pub unit_type: &'static str,
    pub lower_limit: Option<f64>,
    pub upper_limit: Option<f64>,
}

impl ScheduleType {
    pub fn usage(&self) -> String {
        format!("{} {}", self.class_name, self.display_name)
    }

    /// Name given to limits created for this type.
    pub fn default_limits_name(&self) -> String {
        if !self.unit_type.is_empty() {
            self.unit_type.to_string()
        } else if self.is_continuous && self.lower_limit == Some(0.0) && self.upper_limit == Some(1.0) {
            "Fractional".to_string()
        } else {
            "Dimensionless".to_string()
        }
    }

    fn unit_type_or_dimensionless(&self) -> &'static str {
        if self.unit_type.is_empty() {
            "Dimensionless"
        } else {
            self.unit_type
        }
    }
}

const SCHEDULE_TYPES: &[ScheduleType] = &[
    ScheduleType {
        class_name: "Lights",
        display_name: "Lighting",
        is_continuous: true,
        unit_type: "",
        lower_limit: Some(0.0),
        upper_limit: Some(1.0),
    },
    ScheduleType {
        class_name: "People",
        display_name: "Number of People",
        is_continuous: true,
        unit_type: "",
        lower_limit: Some(0.0),
        upper_limit: Some(1.0),
    },
    ScheduleType {
        class_name: "People",
        display_name: "Activity Level",
        is_continuous: true,
        unit_type: "ActivityLevel",
        lower_limit: Some(0.0),
        upper_limit: None,
    },
];

pub struct ScheduleTypeRegistry;

impl ScheduleTypeRegistry {
    pub fn class_names() -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for t in SCHEDULE_TYPES {
            if !out.contains(&t.class_name) {
                out.push(t.class_name);
            }
        }
        out
    }

    pub fn schedule_types(class_name: &str) -> impl Iterator<Item = &'static ScheduleType> + '_ {
        SCHEDULE_TYPES
            .iter()
            .filter(move |t| t.class_name.eq_ignore_ascii_case(class_name))
    }

    pub fn schedule_type(class_name: &str, display_name: &str) -> Option<&'static ScheduleType> {
        Self::schedule_types(class_name).find(|t| t.display_name.eq_ignore_ascii_case(display_name))
    }

    /// Limits fit a type when the unit types agree and the limits are at
    /// least as tight as the type's bounds. `stringent` also requires the
    /// limits to leave unbounded what the type leaves unbounded.
    pub fn is_compatible(
        model: &Model,
        schedule_type: &ScheduleType,
        limits: ScheduleTypeLimits,
        stringent: bool,
    ) -> bool {
        if !limits
            .unit_type(model)
            .eq_ignore_ascii_case(schedule_type.unit_type_or_dimensionless())
        {
            return false;
        }
        let lower_ok = match (schedule_type.lower_limit, limits.lower_limit_value(model)) {
            (Some(bound), Some(l)) => l >= bound - BOUND_TOL,
            (Some(_), None) => false,
            (None, l) => !stringent || l.is_none(),
        };
        let upper_ok = match (schedule_type.upper_limit, limits.upper_limit_value(model)) {
            (Some(bound), Some(u)) => u <= bound + BOUND_TOL,
            (Some(_), None) => false,
            (None, u) => !stringent || u.is_none(),
        };
        lower_ok && upper_ok
    }

    /// Existing limits named as the type's default and stringently
    /// compatible, or new limits matching the type exactly.
    pub fn get_or_create_limits(
        model: &mut Model,
        schedule_type: &ScheduleType,
    ) -> ModelResult<ScheduleTypeLimits> {
        let name = schedule_type.default_limits_name();
        let existing = model.objects::<ScheduleTypeLimits>().into_iter().find(|&l| {
            l.name(model).is_some_and(|n| n.eq_ignore_ascii_case(&name))
                && Self::is_compatible(model, schedule_type, l, true)
        });
        if let Some(limits) = existing {
            return Ok(limits);
        }

        let limits = ScheduleTypeLimits::new(model, &name)?;
        limits.set_lower_limit_value(model, schedule_type.lower_limit)?;
        limits.set_upper_limit_value(model, schedule_type.upper_limit)?;
        limits.set_numeric_type(
            model,
            if schedule_type.is_continuous { "Continuous" } else { "Discrete" },
        )?;
        limits.set_unit_type(model, schedule_type.unit_type_or_dimensionless())?;
        debug!(name = %name, usage = %schedule_type.usage(), "created schedule type limits");
        Ok(limits)
    }

    /// Check `schedule` against the usage, assigning limits when it has none.
    pub fn check_or_assign(
        model: &mut Model,
        schedule: Schedule,
        class_name: &str,
        display_name: &str,
    ) -> ModelResult<()> {
        let usage = format!("{class_name} {display_name}");
        let schedule_name = schedule.name(model).unwrap_or_default();
        let schedule_type = Self::schedule_type(class_name, display_name).ok_or_else(|| {
            ModelError::ScheduleType {
                schedule: schedule_name.clone(),
                usage: usage.clone(),
                reason: "unknown schedule usage".into(),
            }
        })?;

        match schedule.schedule_type_limits(model) {
            Some(limits) if Self::is_compatible(model, schedule_type, limits, false) => Ok(()),
            Some(limits) => Err(ModelError::ScheduleType {
                schedule: schedule_name,
                usage,
                reason: format!(
                    "type limits '{}' do not fit",
                    limits.name(model).unwrap_or_default()
                ),
            }),
            None => {
                let limits = Self::get_or_create_limits(model, schedule_type)?;
                schedule
                    .set_schedule_type_limits(model, limits)
                    .map_err(|e| ModelError::ScheduleType {
                        schedule: schedule_name,
                        usage,
                        reason: e.to_string(),
                    })
            }
        }
    }
}
