//! The subset of the gbXML 6.01 schema read and written by the translators.
//!
//! Elements outside this subset are skipped on read. Numbers are kept as
//! text so that one bad value fails a single object rather than the document.

use hard_xml::{XmlRead, XmlWrite};
use os_core::format_real;

pub const GBXML_NAMESPACE: &str = "http://www.gbxml.org/schema";
pub const GBXML_VERSION: &str = "6.01";

/// Document text after any byte order mark and XML declaration.
pub fn document_body(text: &str) -> &str {
    let text = text.trim_start_matches('\u{feff}').trim_start();
    match text.strip_prefix("<?xml").and_then(|rest| rest.split_once("?>")) {
        Some((_, body)) => body,
        None => text,
    }
}

fn number(text: &Option<String>) -> Option<f64> {
    text.as_deref()?.trim().parse().ok()
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "gbXML")]
pub struct GbXml {
    #[xml(attr = "xmlns")]
    pub xmlns: Option<String>,
    #[xml(attr = "temperatureUnit")]
    pub temperature_unit: Option<String>,
    #[xml(attr = "lengthUnit")]
    pub length_unit: Option<String>,
    #[xml(attr = "areaUnit")]
    pub area_unit: Option<String>,
    #[xml(attr = "volumeUnit")]
    pub volume_unit: Option<String>,
    #[xml(attr = "useSIUnitsForResults")]
    pub use_si_units_for_results: Option<String>,
    #[xml(attr = "version")]
    pub version: Option<String>,

    #[xml(child = "Campus")]
    pub campus: Option<Campus>,
    #[xml(child = "Construction")]
    pub constructions: Vec<GbConstruction>,
    #[xml(child = "Layer")]
    pub layers: Vec<Layer>,
    #[xml(child = "Material")]
    pub materials: Vec<GbMaterial>,
    #[xml(child = "WindowType")]
    pub window_types: Vec<WindowType>,
    #[xml(child = "Zone")]
    pub zones: Vec<Zone>,
    #[xml(child = "DocumentHistory")]
    pub document_history: Option<DocumentHistory>,
}

// ----------------------------------------------------------------------
// Campus and building
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Campus")]
pub struct Campus {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(child = "Location")]
    pub location: Option<Location>,
    #[xml(child = "Building")]
    pub buildings: Vec<GbBuilding>,
    #[xml(child = "Surface")]
    pub surfaces: Vec<GbSurface>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Location")]
pub struct Location {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "Latitude")]
    pub latitude: Option<String>,
    #[xml(flatten_text = "Longitude")]
    pub longitude: Option<String>,
    #[xml(flatten_text = "Elevation")]
    pub elevation: Option<String>,
}

impl Location {
    pub fn latitude(&self) -> Option<f64> {
        number(&self.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        number(&self.longitude)
    }

    pub fn elevation(&self) -> Option<f64> {
        number(&self.elevation)
    }
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Building")]
pub struct GbBuilding {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(attr = "buildingType")]
    pub building_type: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "Area")]
    pub area: Option<String>,
    #[xml(child = "Space")]
    pub spaces: Vec<GbSpace>,
    #[xml(child = "BuildingStorey")]
    pub storeys: Vec<BuildingStorey>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "BuildingStorey")]
pub struct BuildingStorey {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "Level")]
    pub level: Option<String>,
}

impl BuildingStorey {
    pub fn level(&self) -> Option<f64> {
        number(&self.level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Space")]
pub struct GbSpace {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(attr = "zoneIdRef")]
    pub zone_id_ref: Option<String>,
    #[xml(attr = "buildingStoreyIdRef")]
    pub building_storey_id_ref: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "Area")]
    pub area: Option<String>,
    #[xml(flatten_text = "Volume")]
    pub volume: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Zone")]
pub struct Zone {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
}

// ----------------------------------------------------------------------
// Surfaces
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Surface")]
pub struct GbSurface {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(attr = "surfaceType")]
    pub surface_type: Option<String>,
    #[xml(attr = "constructionIdRef")]
    pub construction_id_ref: Option<String>,
    #[xml(attr = "exposedToSun")]
    pub exposed_to_sun: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(child = "AdjacentSpaceId")]
    pub adjacent_spaces: Vec<AdjacentSpaceId>,
    #[xml(child = "RectangularGeometry")]
    pub rectangular_geometry: Option<RectangularGeometry>,
    #[xml(child = "PlanarGeometry")]
    pub planar_geometry: Option<PlanarGeometry>,
    #[xml(child = "Opening")]
    pub openings: Vec<Opening>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "AdjacentSpaceId")]
pub struct AdjacentSpaceId {
    #[xml(attr = "spaceIdRef")]
    pub space_id_ref: Option<String>,
    #[xml(attr = "surfaceType")]
    pub surface_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Opening")]
pub struct Opening {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(attr = "openingType")]
    pub opening_type: Option<String>,
    #[xml(attr = "constructionIdRef")]
    pub construction_id_ref: Option<String>,
    #[xml(attr = "windowTypeIdRef")]
    pub window_type_id_ref: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(child = "RectangularGeometry")]
    pub rectangular_geometry: Option<RectangularGeometry>,
    #[xml(child = "PlanarGeometry")]
    pub planar_geometry: Option<PlanarGeometry>,
}

/// Bounding rectangle of a surface in its own plane; informative only.
#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "RectangularGeometry")]
pub struct RectangularGeometry {
    #[xml(flatten_text = "Azimuth")]
    pub azimuth: Option<String>,
    #[xml(child = "CartesianPoint")]
    pub origin: Option<CartesianPoint>,
    #[xml(flatten_text = "Tilt")]
    pub tilt: Option<String>,
    #[xml(flatten_text = "Width")]
    pub width: Option<String>,
    #[xml(flatten_text = "Height")]
    pub height: Option<String>,
}

impl RectangularGeometry {
    pub fn width(&self) -> Option<f64> {
        number(&self.width)
    }

    pub fn height(&self) -> Option<f64> {
        number(&self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "PlanarGeometry")]
pub struct PlanarGeometry {
    #[xml(child = "PolyLoop")]
    pub poly_loop: Option<PolyLoop>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "PolyLoop")]
pub struct PolyLoop {
    #[xml(child = "CartesianPoint")]
    pub points: Vec<CartesianPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "CartesianPoint")]
pub struct CartesianPoint {
    #[xml(flatten_text = "Coordinate")]
    pub coordinates: Vec<String>,
}

impl CartesianPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            coordinates: vec![format_real(x), format_real(y), format_real(z)],
        }
    }

    /// `None` unless there are exactly three numeric coordinates.
    pub fn xyz(&self) -> Option<[f64; 3]> {
        match self.coordinates.as_slice() {
            [x, y, z] => Some([
                x.trim().parse().ok()?,
                y.trim().parse().ok()?,
                z.trim().parse().ok()?,
            ]),
            _ => None,
        }
    }
}

impl PlanarGeometry {
    pub fn from_points(points: impl IntoIterator<Item = CartesianPoint>) -> Self {
        Self {
            poly_loop: Some(PolyLoop {
                points: points.into_iter().collect(),
            }),
        }
    }

    pub fn points(&self) -> &[CartesianPoint] {
        self.poly_loop.as_ref().map_or(&[], |l| l.points.as_slice())
    }
}

// ----------------------------------------------------------------------
// Constructions and materials
// ----------------------------------------------------------------------

/// Element holding a number with a `unit` attribute.
macro_rules! measure {
    ($(#[$meta:meta])* $name:ident, $tag:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
        #[xml(tag = $tag)]
        pub struct $name {
            #[xml(attr = "unit")]
            pub unit: Option<String>,
            #[xml(text)]
            pub value: String,
        }

        impl $name {
            pub fn new(unit: &str, value: f64) -> Self {
                Self {
                    unit: Some(unit.to_string()),
                    value: format_real(value),
                }
            }

            pub fn number(&self) -> Option<f64> {
                self.value.trim().parse().ok()
            }
        }
    };
}

measure!(Thickness, "Thickness");
measure!(Conductivity, "Conductivity");
measure!(Density, "Density");
measure!(SpecificHeat, "SpecificHeat");
measure!(
    /// Thermal resistance of a material layer.
    RValue,
    "R-value"
);
measure!(
    /// Thermal transmittance of a construction or window.
    UValue,
    "U-value"
);
measure!(SolarHeatGainCoeff, "SolarHeatGainCoeff");

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Transmittance")]
pub struct Transmittance {
    #[xml(attr = "type")]
    pub kind: Option<String>,
    #[xml(attr = "unit")]
    pub unit: Option<String>,
    #[xml(text)]
    pub value: String,
}

impl Transmittance {
    pub fn visible(value: f64) -> Self {
        Self {
            kind: Some("Visible".into()),
            unit: Some("Fraction".into()),
            value: format_real(value),
        }
    }

    pub fn number(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }

    pub fn is_visible(&self) -> bool {
        self.kind
            .as_deref()
            .is_none_or(|k| k.eq_ignore_ascii_case("Visible"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Construction")]
pub struct GbConstruction {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(child = "U-value")]
    pub u_value: Option<UValue>,
    #[xml(child = "LayerId")]
    pub layer_ids: Vec<LayerId>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "LayerId")]
pub struct LayerId {
    #[xml(attr = "layerIdRef")]
    pub layer_id_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Layer")]
pub struct Layer {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(child = "MaterialId")]
    pub material_ids: Vec<MaterialId>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "MaterialId")]
pub struct MaterialId {
    #[xml(attr = "materialIdRef")]
    pub material_id_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "Material")]
pub struct GbMaterial {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(child = "R-value")]
    pub r_value: Option<RValue>,
    #[xml(child = "Thickness")]
    pub thickness: Option<Thickness>,
    #[xml(child = "Conductivity")]
    pub conductivity: Option<Conductivity>,
    #[xml(child = "Density")]
    pub density: Option<Density>,
    #[xml(child = "SpecificHeat")]
    pub specific_heat: Option<SpecificHeat>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "WindowType")]
pub struct WindowType {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(child = "U-value")]
    pub u_value: Option<UValue>,
    #[xml(child = "SolarHeatGainCoeff")]
    pub shgc: Option<SolarHeatGainCoeff>,
    #[xml(child = "Transmittance")]
    pub transmittances: Vec<Transmittance>,
}

// ----------------------------------------------------------------------
// Document history
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "DocumentHistory")]
pub struct DocumentHistory {
    #[xml(child = "CreatedBy")]
    pub created_by: Option<CreatedBy>,
    #[xml(child = "ProgramInfo")]
    pub program_info: Vec<ProgramInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "CreatedBy")]
pub struct CreatedBy {
    #[xml(attr = "programId")]
    pub program_id: Option<String>,
    #[xml(attr = "date")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead, XmlWrite)]
#[xml(tag = "ProgramInfo")]
pub struct ProgramInfo {
    #[xml(attr = "id")]
    pub id: Option<String>,
    #[xml(flatten_text = "ProductName")]
    pub product_name: Option<String>,
    #[xml(flatten_text = "Version")]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nested_geometry_and_skips_unknown_elements() {
        let xml = r#"<gbXML lengthUnit="Feet" version="6.01">
  <Campus id="c1">
    <Location><Latitude>40.0</Latitude><ZipcodeOrPostalCode>80401</ZipcodeOrPostalCode></Location>
    <Surface id="s1" surfaceType="Roof">
      <PlanarGeometry><PolyLoop>
        <CartesianPoint><Coordinate>0</Coordinate><Coordinate>0</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
        <CartesianPoint><Coordinate>1</Coordinate><Coordinate>0</Coordinate></CartesianPoint>
      </PolyLoop></PlanarGeometry>
    </Surface>
  </Campus>
  <Material id="m1"><Thickness unit="Meters">0.1</Thickness></Material>
</gbXML>"#;
        let doc = GbXml::from_str(xml).unwrap();
        assert_eq!(doc.length_unit.as_deref(), Some("Feet"));
        let campus = doc.campus.unwrap();
        assert_eq!(campus.location.unwrap().latitude(), Some(40.0));
        let points = campus.surfaces[0].planar_geometry.as_ref().unwrap().points();
        assert_eq!(points[0].xyz(), Some([0.0, 0.0, 10.0]));
        assert_eq!(points[1].xyz(), None);
        let thickness = doc.materials[0].thickness.as_ref().unwrap();
        assert_eq!(thickness.unit.as_deref(), Some("Meters"));
        assert_eq!(thickness.number(), Some(0.1));
    }

    #[test]
    fn declaration_is_skipped() {
        let body = document_body("\u{feff}<?xml version=\"1.0\"?>\n<gbXML/>");
        assert_eq!(body.trim(), "<gbXML/>");
        assert_eq!(document_body("<gbXML/>"), "<gbXML/>");
    }

    #[test]
    fn written_measures_carry_units() {
        let material = GbMaterial {
            id: Some("m1".into()),
            thickness: Some(Thickness::new("Meters", 0.25)),
            ..GbMaterial::default()
        };
        let text = material.to_string().unwrap();
        assert!(text.contains(r#"<Thickness unit="Meters">0.25</Thickness>"#));
        let back = GbMaterial::from_str(&text).unwrap();
        assert_eq!(back, material);
    }
}
