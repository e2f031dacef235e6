//! SDD elements read by the reverse translator.
//!
//! SDD nests everything by containment: `Proj > Bldg > Story > Spc`, with
//! each surface kind as its own element under `Spc` and openings under their
//! surface. Envelope definitions (`Mat`, `ConsAssm`, `FenCons`) live on `Proj`
//! and are referenced by name.

use hard_xml::XmlRead;

/// Document text after any byte order mark and XML declaration.
pub fn document_body(text: &str) -> &str {
    let text = text.trim_start_matches('\u{feff}').trim_start();
    match text.strip_prefix("<?xml").and_then(|rest| rest.split_once("?>")) {
        Some((_, body)) => body,
        None => text,
    }
}

pub(crate) fn number(text: &Option<String>) -> Option<f64> {
    text.as_deref()?.trim().parse().ok()
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "SDDXML")]
pub struct SddXml {
    #[xml(child = "Proj")]
    pub project: Option<Proj>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "Proj")]
pub struct Proj {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(child = "Bldg")]
    pub building: Option<Bldg>,
    #[xml(child = "Mat")]
    pub materials: Vec<Mat>,
    #[xml(child = "ConsAssm")]
    pub constructions: Vec<ConsAssm>,
    #[xml(child = "FenCons")]
    pub fenestration: Vec<FenCons>,
}

// ----------------------------------------------------------------------
// Building
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "Bldg")]
pub struct Bldg {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    /// Building azimuth, degrees clockwise from north.
    #[xml(flatten_text = "BldgAz")]
    pub azimuth: Option<String>,
    /// North angle, degrees; the building is rotated by its complement.
    #[xml(flatten_text = "NAng")]
    pub north_angle: Option<String>,
    #[xml(child = "ThrmlZn")]
    pub zones: Vec<ThrmlZn>,
    #[xml(child = "Story")]
    pub stories: Vec<Story>,
}

impl Bldg {
    pub fn azimuth(&self) -> Option<f64> {
        number(&self.azimuth)
    }

    pub fn north_angle(&self) -> Option<f64> {
        number(&self.north_angle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "ThrmlZn")]
pub struct ThrmlZn {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "Story")]
pub struct Story {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "Z")]
    pub z: Option<String>,
    #[xml(flatten_text = "FlrToFlrHgt")]
    pub floor_to_floor_height: Option<String>,
    #[xml(child = "Spc")]
    pub spaces: Vec<Spc>,
}

impl Story {
    /// Feet.
    pub fn z(&self) -> Option<f64> {
        number(&self.z)
    }

    /// Feet.
    pub fn floor_to_floor_height(&self) -> Option<f64> {
        number(&self.floor_to_floor_height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "Spc")]
pub struct Spc {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "ThrmlZnRef")]
    pub zone_ref: Option<String>,
    #[xml(child = "ExtWall")]
    pub exterior_walls: Vec<ExtWall>,
    #[xml(child = "ExtFlr")]
    pub exterior_floors: Vec<ExtFlr>,
    #[xml(child = "Roof")]
    pub roofs: Vec<Roof>,
    #[xml(child = "UndgrFlr")]
    pub underground_floors: Vec<UndgrFlr>,
    #[xml(child = "UndgrWall")]
    pub underground_walls: Vec<UndgrWall>,
    #[xml(child = "Ceiling")]
    pub ceilings: Vec<Ceiling>,
    #[xml(child = "IntWall")]
    pub interior_walls: Vec<IntWall>,
    #[xml(child = "IntFlr")]
    pub interior_floors: Vec<IntFlr>,
}

impl Spc {
    /// Every surface of the space, in element-kind order.
    pub fn surfaces(&self) -> Vec<SurfaceView<'_>> {
        let mut out = Vec::new();
        out.extend(self.exterior_walls.iter().map(ExtWall::view));
        out.extend(self.exterior_floors.iter().map(ExtFlr::view));
        out.extend(self.roofs.iter().map(Roof::view));
        out.extend(self.underground_floors.iter().map(UndgrFlr::view));
        out.extend(self.underground_walls.iter().map(UndgrWall::view));
        out.extend(self.ceilings.iter().map(Ceiling::view));
        out.extend(self.interior_walls.iter().map(IntWall::view));
        out.extend(self.interior_floors.iter().map(IntFlr::view));
        out
    }
}

// ----------------------------------------------------------------------
// Surfaces and openings
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    ExtWall,
    ExtFlr,
    Roof,
    UndgrFlr,
    UndgrWall,
    Ceiling,
    IntWall,
    IntFlr,
}

impl SurfaceKind {
    pub fn tag(self) -> &'static str {
        match self {
            SurfaceKind::ExtWall => "ExtWall",
            SurfaceKind::ExtFlr => "ExtFlr",
            SurfaceKind::Roof => "Roof",
            SurfaceKind::UndgrFlr => "UndgrFlr",
            SurfaceKind::UndgrWall => "UndgrWall",
            SurfaceKind::Ceiling => "Ceiling",
            SurfaceKind::IntWall => "IntWall",
            SurfaceKind::IntFlr => "IntFlr",
        }
    }
}

/// Borrowed view over any of the surface elements.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceView<'a> {
    pub kind: SurfaceKind,
    pub name: Option<&'a str>,
    pub construction_ref: Option<&'a str>,
    pub adjacent_space_ref: Option<&'a str>,
    pub outside_boundary_condition: Option<&'a str>,
    pub poly_loop: Option<&'a PolyLp>,
    pub windows: &'a [Win],
    pub doors: &'a [Dr],
    pub skylights: &'a [Skylt],
}

macro_rules! surface_element {
    ($name:ident, $tag:tt) => {
        #[derive(Debug, Clone, Default, PartialEq, XmlRead)]
        #[xml(tag = $tag)]
        pub struct $name {
            #[xml(flatten_text = "Name")]
            pub name: Option<String>,
            #[xml(flatten_text = "ConsAssmRef")]
            pub construction_ref: Option<String>,
            #[xml(flatten_text = "AdjacentSpcRef")]
            pub adjacent_space_ref: Option<String>,
            #[xml(flatten_text = "OutsdBndryCond")]
            pub outside_boundary_condition: Option<String>,
            #[xml(child = "PolyLp")]
            pub poly_loop: Option<PolyLp>,
            #[xml(child = "Win")]
            pub windows: Vec<Win>,
            #[xml(child = "Dr")]
            pub doors: Vec<Dr>,
            #[xml(child = "Skylt")]
            pub skylights: Vec<Skylt>,
        }

        impl $name {
            pub fn view(&self) -> SurfaceView<'_> {
                SurfaceView {
                    kind: SurfaceKind::$name,
                    name: self.name.as_deref(),
                    construction_ref: self.construction_ref.as_deref(),
                    adjacent_space_ref: self.adjacent_space_ref.as_deref(),
                    outside_boundary_condition: self.outside_boundary_condition.as_deref(),
                    poly_loop: self.poly_loop.as_ref(),
                    windows: &self.windows,
                    doors: &self.doors,
                    skylights: &self.skylights,
                }
            }
        }
    };
}

surface_element!(ExtWall, "ExtWall");
surface_element!(ExtFlr, "ExtFlr");
surface_element!(Roof, "Roof");
surface_element!(UndgrFlr, "UndgrFlr");
surface_element!(UndgrWall, "UndgrWall");
surface_element!(Ceiling, "Ceiling");
surface_element!(IntWall, "IntWall");
surface_element!(IntFlr, "IntFlr");

macro_rules! opening_element {
    ($name:ident, $tag:tt) => {
        #[derive(Debug, Clone, Default, PartialEq, XmlRead)]
        #[xml(tag = $tag)]
        pub struct $name {
            #[xml(flatten_text = "Name")]
            pub name: Option<String>,
            #[xml(flatten_text = "FenConsRef")]
            pub fenestration_ref: Option<String>,
            #[xml(flatten_text = "DrConsRef")]
            pub door_ref: Option<String>,
            #[xml(child = "PolyLp")]
            pub poly_loop: Option<PolyLp>,
        }
    };
}

opening_element!(Win, "Win");
opening_element!(Dr, "Dr");
opening_element!(Skylt, "Skylt");

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "PolyLp")]
pub struct PolyLp {
    #[xml(child = "CartesianPt")]
    pub points: Vec<CartesianPt>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "CartesianPt")]
pub struct CartesianPt {
    #[xml(flatten_text = "Coord")]
    pub coords: Vec<String>,
}

impl CartesianPt {
    /// `None` unless there are exactly three numeric coordinates.
    pub fn xyz(&self) -> Option<[f64; 3]> {
        match self.coords.as_slice() {
            [x, y, z] => Some([
                x.trim().parse().ok()?,
                y.trim().parse().ok()?,
                z.trim().parse().ok()?,
            ]),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------
// Envelope definitions
// ----------------------------------------------------------------------

/// Opaque material in IP units: inches, Btu/(h·ft·°F), lb/ft³, Btu/(lb·°F).
#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "Mat")]
pub struct Mat {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "Thkns")]
    pub thickness: Option<String>,
    #[xml(flatten_text = "ThrmlCndct")]
    pub conductivity: Option<String>,
    #[xml(flatten_text = "Dens")]
    pub density: Option<String>,
    #[xml(flatten_text = "SpecHt")]
    pub specific_heat: Option<String>,
    /// h·ft²·°F/Btu.
    #[xml(flatten_text = "RVal")]
    pub r_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "ConsAssm")]
pub struct ConsAssm {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "SpecMthd")]
    pub spec_method: Option<String>,
    /// Outside to inside.
    #[xml(flatten_text = "MatRef")]
    pub material_refs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, XmlRead)]
#[xml(tag = "FenCons")]
pub struct FenCons {
    #[xml(flatten_text = "Name")]
    pub name: Option<String>,
    #[xml(flatten_text = "SHGC")]
    pub shgc: Option<String>,
    #[xml(flatten_text = "UFactor")]
    pub u_factor: Option<String>,
    #[xml(flatten_text = "UFactorSim")]
    pub u_factor_sim: Option<String>,
    #[xml(flatten_text = "VT")]
    pub visible_transmittance: Option<String>,
}

impl FenCons {
    /// Btu/(h·ft²·°F); the simulation value wins over the rated one.
    pub fn u_factor(&self) -> Option<f64> {
        number(&self.u_factor_sim).or_else(|| number(&self.u_factor))
    }

    pub fn shgc(&self) -> Option<f64> {
        number(&self.shgc)
    }

    pub fn visible_transmittance(&self) -> Option<f64> {
        number(&self.visible_transmittance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surfaces_of_every_kind_are_collected() {
        let spc = Spc::from_str(
            "<Spc><Name>A</Name>\
               <IntWall><Name>P</Name><AdjacentSpcRef>B</AdjacentSpcRef></IntWall>\
               <ExtWall><Name>W</Name><Win><Name>G</Name></Win></ExtWall>\
               <Furniture>ignored</Furniture>\
             </Spc>",
        )
        .unwrap();
        let surfaces = spc.surfaces();
        assert_eq!(surfaces.len(), 2);
        assert_eq!(surfaces[0].kind, SurfaceKind::ExtWall);
        assert_eq!(surfaces[0].windows.len(), 1);
        assert_eq!(surfaces[1].kind, SurfaceKind::IntWall);
        assert_eq!(surfaces[1].adjacent_space_ref, Some("B"));
    }

    #[test]
    fn indexed_references_keep_their_text() {
        let cons = ConsAssm::from_str(
            "<ConsAssm><Name>C</Name><SpecMthd>Layers</SpecMthd>\
               <MatRef index=\"0\">Brick</MatRef><MatRef index=\"1\">Gypsum</MatRef>\
             </ConsAssm>",
        )
        .unwrap();
        assert_eq!(cons.material_refs, vec!["Brick", "Gypsum"]);
    }

    #[test]
    fn simulated_u_factor_is_preferred() {
        let fen = FenCons::from_str(
            "<FenCons><Name>F</Name><UFactor>0.6</UFactor><UFactorSim>0.5</UFactorSim></FenCons>",
        )
        .unwrap();
        assert_eq!(fen.u_factor(), Some(0.5));
    }

    #[test]
    fn points_need_three_coordinates() {
        let pt = CartesianPt::from_str("<CartesianPt><Coord>1</Coord><Coord>2</Coord></CartesianPt>")
            .unwrap();
        assert_eq!(pt.xyz(), None);
    }
}
