//! Internal gains attached to spaces.

use crate::error::{ModelError, ModelResult};
use crate::fields::{lights, people};
use crate::model::Model;
use crate::object::{ModelObject, model_object};
use crate::schedule::Schedule;
use crate::schedule_types::ScheduleTypeRegistry;
use crate::zone::Space;

fn schedule_at(model: &Model, id: os_core::ObjectId, index: usize) -> Option<Schedule> {
    let target = model.workspace().get_target(id, index)?;
    Schedule::from_id(model, target)
}

fn set_schedule(
    model: &mut Model,
    id: os_core::ObjectId,
    index: usize,
    schedule: Schedule,
    (class_name, display_name): (&str, &str),
) -> ModelResult<()> {
    ScheduleTypeRegistry::check_or_assign(model, schedule, class_name, display_name)?;
    Ok(model.workspace_mut().set_pointer(id, index, schedule.id())?)
}

model_object!(
    /// Occupants of a space.
    People => "OS:People"
);

impl People {
    pub fn new(model: &mut Model, space: Space, number_of_people: f64) -> ModelResult<Self> {
        let p: People = model.create(None)?;
        let init = p
            .set_space(model, space)
            .and_then(|()| p.set_number_of_people(model, number_of_people));
        if let Err(e) = init {
            model.workspace_mut().remove_object(p.id())?;
            return Err(e);
        }
        Ok(p)
    }

    pub fn space(self, model: &Model) -> Option<Space> {
        model
            .workspace()
            .get_target(self.id(), people::SPACE_NAME)
            .map(Space::from_id_unchecked)
    }

    pub fn set_space(self, model: &mut Model, space: Space) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), people::SPACE_NAME, space.id())?)
    }

    pub fn number_of_people(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double(self.id(), people::NUMBER_OF_PEOPLE)
            .unwrap_or(0.0)
    }

    pub fn set_number_of_people(self, model: &mut Model, n: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), people::NUMBER_OF_PEOPLE, n)?)
    }

    pub fn number_of_people_schedule(self, model: &Model) -> Option<Schedule> {
        schedule_at(model, self.id(), people::NUMBER_OF_PEOPLE_SCHEDULE_NAME)
    }

    /// Fraction of the peak number present; limits must be 0..1.
    pub fn set_number_of_people_schedule(self, model: &mut Model, schedule: Schedule) -> ModelResult<()> {
        set_schedule(
            model,
            self.id(),
            people::NUMBER_OF_PEOPLE_SCHEDULE_NAME,
            schedule,
            ("People", "Number of People"),
        )
    }

    pub fn activity_level_schedule(self, model: &Model) -> Option<Schedule> {
        schedule_at(model, self.id(), people::ACTIVITY_LEVEL_SCHEDULE_NAME)
    }

    /// Metabolic rate per person, W.
    pub fn set_activity_level_schedule(self, model: &mut Model, schedule: Schedule) -> ModelResult<()> {
        set_schedule(
            model,
            self.id(),
            people::ACTIVITY_LEVEL_SCHEDULE_NAME,
            schedule,
            ("People", "Activity Level"),
        )
    }

    pub fn fraction_radiant(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), people::FRACTION_RADIANT)
            .unwrap_or(0.3)
    }

    pub fn set_fraction_radiant(self, model: &mut Model, value: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), people::FRACTION_RADIANT, value)?)
    }
}

model_object!(
    /// Electric lighting of a space.
    Lights => "OS:Lights"
);

impl Lights {
    pub fn new(model: &mut Model, space: Space, lighting_level: f64) -> ModelResult<Self> {
        let l: Lights = model.create(None)?;
        let init = l
            .set_space(model, space)
            .and_then(|()| l.set_lighting_level(model, lighting_level));
        if let Err(e) = init {
            model.workspace_mut().remove_object(l.id())?;
            return Err(e);
        }
        Ok(l)
    }

    pub fn space(self, model: &Model) -> Option<Space> {
        model
            .workspace()
            .get_target(self.id(), lights::SPACE_NAME)
            .map(Space::from_id_unchecked)
    }

    pub fn set_space(self, model: &mut Model, space: Space) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_pointer(self.id(), lights::SPACE_NAME, space.id())?)
    }

    /// Installed power, W.
    pub fn lighting_level(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double(self.id(), lights::LIGHTING_LEVEL)
            .unwrap_or(0.0)
    }

    pub fn set_lighting_level(self, model: &mut Model, watts: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), lights::LIGHTING_LEVEL, watts)?)
    }

    pub fn schedule(self, model: &Model) -> Option<Schedule> {
        schedule_at(model, self.id(), lights::SCHEDULE_NAME)
    }

    pub fn set_schedule(self, model: &mut Model, schedule: Schedule) -> ModelResult<()> {
        set_schedule(
            model,
            self.id(),
            lights::SCHEDULE_NAME,
            schedule,
            ("Lights", "Lighting"),
        )
    }

    pub fn fraction_radiant(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), lights::FRACTION_RADIANT)
            .unwrap_or(0.7)
    }

    pub fn fraction_visible(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), lights::FRACTION_VISIBLE)
            .unwrap_or(0.2)
    }

    pub fn set_fractions(self, model: &mut Model, radiant: f64, visible: f64) -> ModelResult<()> {
        if radiant + visible > 1.0 {
            return Err(ModelError::InvalidValue {
                field: "lights fractions",
                value: format!("{radiant} + {visible}"),
                reason: "radiant and visible fractions exceed 1".into(),
            });
        }
        let ws = model.workspace_mut();
        ws.set_double(self.id(), lights::FRACTION_RADIANT, radiant)?;
        ws.set_double(self.id(), lights::FRACTION_VISIBLE, visible)?;
        Ok(())
    }
}
