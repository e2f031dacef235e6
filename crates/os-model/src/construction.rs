//! Materials and layered constructions.

use os_core::ObjectId;

use crate::error::{ModelError, ModelResult};
use crate::fields::{construction, material, simple_glazing};
use crate::model::Model;
use crate::object::{ModelObject, model_object};

model_object!(
    /// Opaque layer with thickness and bulk thermal properties.
    StandardOpaqueMaterial => "OS:Material"
);

impl StandardOpaqueMaterial {
    pub fn new(
        model: &mut Model,
        roughness: &str,
        thickness: f64,
        conductivity: f64,
        density: f64,
        specific_heat: f64,
    ) -> ModelResult<Self> {
        let m: StandardOpaqueMaterial = model.create(None)?;
        let init = (|| -> ModelResult<()> {
            let ws = model.workspace_mut();
            ws.set_string(m.id(), material::ROUGHNESS, roughness)?;
            ws.set_double(m.id(), material::THICKNESS, thickness)?;
            ws.set_double(m.id(), material::CONDUCTIVITY, conductivity)?;
            ws.set_double(m.id(), material::DENSITY, density)?;
            ws.set_double(m.id(), material::SPECIFIC_HEAT, specific_heat)?;
            Ok(())
        })();
        if let Err(e) = init {
            model.workspace_mut().remove_object(m.id())?;
            return Err(e);
        }
        Ok(m)
    }

    fn double(self, model: &Model, index: usize) -> f64 {
        model
            .workspace()
            .get_double_or_default(self.id(), index)
            .unwrap_or(0.0)
    }

    fn set(self, model: &mut Model, index: usize, value: f64) -> ModelResult<()> {
        Ok(model.workspace_mut().set_double(self.id(), index, value)?)
    }

    pub fn roughness(self, model: &Model) -> Option<String> {
        model.workspace().get_string(self.id(), material::ROUGHNESS)
    }

    pub fn thickness(self, model: &Model) -> f64 {
        self.double(model, material::THICKNESS)
    }

    pub fn set_thickness(self, model: &mut Model, meters: f64) -> ModelResult<()> {
        self.set(model, material::THICKNESS, meters)
    }

    pub fn conductivity(self, model: &Model) -> f64 {
        self.double(model, material::CONDUCTIVITY)
    }

    pub fn set_conductivity(self, model: &mut Model, value: f64) -> ModelResult<()> {
        self.set(model, material::CONDUCTIVITY, value)
    }

    pub fn density(self, model: &Model) -> f64 {
        self.double(model, material::DENSITY)
    }

    pub fn specific_heat(self, model: &Model) -> f64 {
        self.double(model, material::SPECIFIC_HEAT)
    }

    pub fn thermal_absorptance(self, model: &Model) -> f64 {
        self.double(model, material::THERMAL_ABSORPTANCE)
    }

    pub fn solar_absorptance(self, model: &Model) -> f64 {
        self.double(model, material::SOLAR_ABSORPTANCE)
    }

    pub fn set_solar_absorptance(self, model: &mut Model, value: f64) -> ModelResult<()> {
        self.set(model, material::SOLAR_ABSORPTANCE, value)
    }

    pub fn visible_absorptance(self, model: &Model) -> f64 {
        self.double(model, material::VISIBLE_ABSORPTANCE)
    }

    /// Conductivity over thickness, W/m2-K.
    pub fn thermal_conductance(self, model: &Model) -> Option<f64> {
        let t = self.thickness(model);
        (t > 0.0).then(|| self.conductivity(model) / t)
    }

    /// Thickness over conductivity, m2-K/W.
    pub fn thermal_resistance(self, model: &Model) -> Option<f64> {
        let k = self.conductivity(model);
        (k > 0.0).then(|| self.thickness(model) / k)
    }
}

model_object!(
    /// Window described by its U-factor and solar heat gain coefficient.
    SimpleGlazing => "OS:WindowMaterial:SimpleGlazingSystem"
);

impl SimpleGlazing {
    pub fn new(model: &mut Model, u_factor: f64, shgc: f64) -> ModelResult<Self> {
        let g: SimpleGlazing = model.create(None)?;
        let init = g
            .set_u_factor(model, u_factor)
            .and_then(|()| g.set_solar_heat_gain_coefficient(model, shgc));
        if let Err(e) = init {
            model.workspace_mut().remove_object(g.id())?;
            return Err(e);
        }
        Ok(g)
    }

    pub fn u_factor(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double(self.id(), simple_glazing::U_FACTOR)
            .unwrap_or(0.0)
    }

    pub fn set_u_factor(self, model: &mut Model, value: f64) -> ModelResult<()> {
        Ok(model
            .workspace_mut()
            .set_double(self.id(), simple_glazing::U_FACTOR, value)?)
    }

    pub fn solar_heat_gain_coefficient(self, model: &Model) -> f64 {
        model
            .workspace()
            .get_double(self.id(), simple_glazing::SOLAR_HEAT_GAIN_COEFFICIENT)
            .unwrap_or(0.0)
    }

    pub fn set_solar_heat_gain_coefficient(self, model: &mut Model, value: f64) -> ModelResult<()> {
        Ok(model.workspace_mut().set_double(
            self.id(),
            simple_glazing::SOLAR_HEAT_GAIN_COEFFICIENT,
            value,
        )?)
    }

    pub fn visible_transmittance(self, model: &Model) -> Option<f64> {
        model
            .workspace()
            .get_double(self.id(), simple_glazing::VISIBLE_TRANSMITTANCE)
    }

    pub fn set_visible_transmittance(self, model: &mut Model, value: f64) -> ModelResult<()> {
        Ok(model.workspace_mut().set_double(
            self.id(),
            simple_glazing::VISIBLE_TRANSMITTANCE,
            value,
        )?)
    }
}

/// Any object that can be a construction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Opaque(StandardOpaqueMaterial),
    Glazing(SimpleGlazing),
}

impl Material {
    pub fn from_id(model: &Model, id: ObjectId) -> Option<Self> {
        StandardOpaqueMaterial::from_id(model, id)
            .map(Material::Opaque)
            .or_else(|| SimpleGlazing::from_id(model, id).map(Material::Glazing))
    }

    pub fn id(self) -> ObjectId {
        match self {
            Material::Opaque(m) => m.id(),
            Material::Glazing(g) => g.id(),
        }
    }

    pub fn name(self, model: &Model) -> Option<String> {
        model.workspace().name(self.id()).map(str::to_string)
    }

    pub fn is_fenestration(self) -> bool {
        matches!(self, Material::Glazing(_))
    }
}

impl From<StandardOpaqueMaterial> for Material {
    fn from(m: StandardOpaqueMaterial) -> Self {
        Material::Opaque(m)
    }
}

impl From<SimpleGlazing> for Material {
    fn from(g: SimpleGlazing) -> Self {
        Material::Glazing(g)
    }
}

model_object!(
    /// Ordered material layers, outside to inside.
    Construction => "OS:Construction"
);

impl Construction {
    pub fn new(model: &mut Model) -> ModelResult<Self> {
        model.create(None)
    }

    pub fn with_layers(model: &mut Model, layers: &[Material]) -> ModelResult<Self> {
        let c = Self::new(model)?;
        c.set_layers(model, layers)?;
        Ok(c)
    }

    pub fn num_layers(self, model: &Model) -> usize {
        model.workspace().num_extensible_groups(self.id())
    }

    pub fn layers(self, model: &Model) -> Vec<Material> {
        let ws = model.workspace();
        (0..self.num_layers(model))
            .filter_map(|i| ws.get_target(self.id(), construction::FIRST_LAYER + i))
            .filter_map(|id| Material::from_id(model, id))
            .collect()
    }

    pub fn set_layers(self, model: &mut Model, layers: &[Material]) -> ModelResult<()> {
        Self::check_layers(layers)?;
        let ws = model.workspace_mut();
        ws.clear_extensible_groups(self.id())?;
        for layer in layers {
            let handle = ws
                .handle(layer.id())
                .ok_or(ModelError::NotInModel(layer.id()))?
                .to_string();
            ws.push_extensible_group(self.id(), &[&handle])?;
        }
        Ok(())
    }

    /// Insert before `index`; past the end appends.
    pub fn insert_layer(self, model: &mut Model, index: usize, layer: Material) -> ModelResult<()> {
        let mut layers = self.layers(model);
        layers.insert(index.min(layers.len()), layer);
        self.set_layers(model, &layers)
    }

    pub fn erase_layer(self, model: &mut Model, index: usize) -> ModelResult<Option<Material>> {
        let mut layers = self.layers(model);
        if index >= layers.len() {
            return Ok(None);
        }
        let removed = layers.remove(index);
        self.set_layers(model, &layers)?;
        Ok(Some(removed))
    }

    /// Glazing layers cannot be mixed with opaque ones.
    fn check_layers(layers: &[Material]) -> ModelResult<()> {
        let glazing = layers.iter().filter(|m| m.is_fenestration()).count();
        if glazing > 0 && glazing != layers.len() {
            return Err(ModelError::InvalidValue {
                field: "construction layers",
                value: format!("{} layers", layers.len()),
                reason: "opaque and glazing layers cannot be mixed".into(),
            });
        }
        if glazing > 1 {
            return Err(ModelError::InvalidValue {
                field: "construction layers",
                value: format!("{glazing} glazing layers"),
                reason: "a simple glazing system is the only layer".into(),
            });
        }
        Ok(())
    }

    pub fn is_fenestration(self, model: &Model) -> bool {
        self.layers(model).iter().any(|m| m.is_fenestration())
    }

    pub fn is_opaque(self, model: &Model) -> bool {
        !self.is_fenestration(model)
    }

    /// Surface-to-surface conductance of an opaque construction, W/m2-K;
    /// the U-factor of a glazing construction.
    pub fn thermal_conductance(self, model: &Model) -> Option<f64> {
        let layers = self.layers(model);
        if layers.is_empty() {
            return None;
        }
        let mut resistance = 0.0;
        for layer in layers {
            match layer {
                Material::Glazing(g) => return Some(g.u_factor(model)),
                Material::Opaque(m) => resistance += m.thermal_resistance(model)?,
            }
        }
        (resistance > 0.0).then(|| 1.0 / resistance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick(model: &mut Model) -> StandardOpaqueMaterial {
        StandardOpaqueMaterial::new(model, "MediumRough", 0.1, 0.5, 1900.0, 800.0).unwrap()
    }

    fn insulation(model: &mut Model) -> StandardOpaqueMaterial {
        StandardOpaqueMaterial::new(model, "MediumSmooth", 0.05, 0.025, 30.0, 1200.0).unwrap()
    }

    #[test]
    fn conductance_sums_layer_resistances() {
        let mut model = Model::new();
        let b = brick(&mut model);
        let i = insulation(&mut model);
        let c = Construction::with_layers(&mut model, &[b.into(), i.into()]).unwrap();
        assert_eq!(c.num_layers(&model), 2);
        // 0.1/0.5 + 0.05/0.025 = 2.2
        let u = c.thermal_conductance(&model).unwrap();
        assert!((u - 1.0 / 2.2).abs() < 1e-12);
        assert!(c.is_opaque(&model));
    }

    #[test]
    fn layers_keep_order_and_follow_removal() {
        let mut model = Model::new();
        let b = brick(&mut model);
        let i = insulation(&mut model);
        let c = Construction::new(&mut model).unwrap();
        c.insert_layer(&mut model, 0, i.into()).unwrap();
        c.insert_layer(&mut model, 0, b.into()).unwrap();
        assert_eq!(c.layers(&model), vec![Material::Opaque(b), Material::Opaque(i)]);

        assert_eq!(c.erase_layer(&mut model, 0).unwrap(), Some(Material::Opaque(b)));
        assert_eq!(c.layers(&model), vec![Material::Opaque(i)]);
        assert_eq!(c.erase_layer(&mut model, 5).unwrap(), None);
    }

    #[test]
    fn invalid_material_values_are_rejected() {
        let mut model = Model::new();
        assert!(StandardOpaqueMaterial::new(&mut model, "Rough", 0.0, 1.0, 1.0, 900.0).is_err());
        assert!(StandardOpaqueMaterial::new(&mut model, "Bumpy", 0.1, 1.0, 1.0, 900.0).is_err());
        assert!(model.objects::<StandardOpaqueMaterial>().is_empty());
        assert!(SimpleGlazing::new(&mut model, 2.0, 1.0).is_err());
    }

    #[test]
    fn glazing_construction_reports_u_factor() {
        let mut model = Model::new();
        let g = SimpleGlazing::new(&mut model, 1.8, 0.4).unwrap();
        let c = Construction::with_layers(&mut model, &[g.into()]).unwrap();
        assert!(c.is_fenestration(&model));
        assert_eq!(c.thermal_conductance(&model), Some(1.8));

        let b = brick(&mut model);
        assert!(c.set_layers(&mut model, &[g.into(), b.into()]).is_err());
    }
}
