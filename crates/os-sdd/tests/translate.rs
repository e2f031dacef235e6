use os_core::units::{
    CONDUCTIVITY_IP_TO_SI, DENSITY_IP_TO_SI, SPECIFIC_HEAT_IP_TO_SI, U_FACTOR_IP_TO_SI,
};
use os_model::{
    BoundaryCondition, Building, BuildingStory, Construction, Model, ModelObject, SimpleGlazing,
    Space, StandardOpaqueMaterial, SubSurface, SubSurfaceType, Surface, SurfaceType, ThermalZone,
};
use os_sdd::ReverseTranslator;

const SQ_FT: f64 = 0.3048 * 0.3048;

fn poly(points: &[[f64; 3]]) -> String {
    let mut out = String::from("<PolyLp>");
    for [x, y, z] in points {
        out.push_str(&format!(
            "<CartesianPt><Coord>{x}</Coord><Coord>{y}</Coord><Coord>{z}</Coord></CartesianPt>"
        ));
    }
    out.push_str("</PolyLp>");
    out
}

fn office_document() -> String {
    let south = poly(&[[0., 0., 10.], [0., 0., 0.], [20., 0., 0.], [20., 0., 10.]]);
    let window = poly(&[[5., 0., 8.], [5., 0., 3.], [15., 0., 3.], [15., 0., 8.]]);
    let door = poly(&[[16., 0., 7.], [16., 0., 0.], [19., 0., 0.], [19., 0., 7.]]);
    let slab = poly(&[[0., 0., 0.], [0., 20., 0.], [20., 20., 0.], [20., 0., 0.]]);
    let partition = poly(&[[20., 0., 10.], [20., 0., 0.], [20., 20., 0.], [20., 20., 10.]]);
    let lid = poly(&[[0., 0., 10.], [20., 0., 10.], [20., 20., 10.], [0., 20., 10.]]);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SDDXML xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <RulesetFilename file="CA T24 Com 2019.bin"/>
  <Proj>
    <Name>Small Office Project</Name>
    <Bldg>
      <Name>Small Office</Name>
      <NAng>90</NAng>
      <ThrmlZn><Name>Zone A</Name></ThrmlZn>
      <Story>
        <Name>Ground</Name>
        <Z>0</Z>
        <FlrToFlrHgt>10</FlrToFlrHgt>
        <Spc>
          <Name>Office</Name>
          <ThrmlZnRef>Zone A</ThrmlZnRef>
          <ExtWall>
            <Name>South Wall</Name>
            <ConsAssmRef>Wall Cons</ConsAssmRef>
            {south}
            <Win><Name>Win 1</Name><FenConsRef>Dbl Clr</FenConsRef>{window}</Win>
            <Dr><Name>Door 1</Name>{door}</Dr>
          </ExtWall>
          <Roof>
            <Name>Bad Roof</Name>
            <PolyLp><CartesianPt><Coord>0</Coord><Coord>0</Coord></CartesianPt></PolyLp>
          </Roof>
          <UndgrFlr><Name>Slab</Name>{slab}</UndgrFlr>
          <Ceiling><Name>Lid</Name><OutsdBndryCond>Outdoors</OutsdBndryCond>{lid}</Ceiling>
          <IntWall><Name>Partition</Name><AdjacentSpcRef>Storage</AdjacentSpcRef>{partition}</IntWall>
        </Spc>
        <Spc>
          <Name>Storage</Name>
        </Spc>
      </Story>
    </Bldg>
    <Mat>
      <Name>Gypsum</Name>
      <Thkns>0.625</Thkns>
      <ThrmlCndct>0.0926</ThrmlCndct>
      <Dens>50</Dens>
      <SpecHt>0.26</SpecHt>
    </Mat>
    <Mat><Name>Batt</Name><RVal>13</RVal></Mat>
    <Mat><Thkns>1</Thkns></Mat>
    <ConsAssm>
      <Name>Wall Cons</Name>
      <SpecMthd>Layers</SpecMthd>
      <MatRef index="0">Gypsum</MatRef>
      <MatRef index="1">Batt</MatRef>
    </ConsAssm>
    <ConsAssm><Name>No Method</Name></ConsAssm>
    <FenCons>
      <Name>Dbl Clr</Name>
      <SHGC>0.4</SHGC>
      <UFactor>0.6</UFactor>
      <UFactorSim>0.5</UFactorSim>
      <VT>0.6</VT>
    </FenCons>
  </Proj>
</SDDXML>
"#
    )
}

fn translate() -> (Model, ReverseTranslator) {
    let mut rt = ReverseTranslator::new();
    let model = rt.translate_str(&office_document()).unwrap();
    (model, rt)
}

#[test]
fn building_stories_and_zones() {
    let (model, _) = translate();
    let building = model.objects::<Building>()[0];
    assert_eq!(building.name(&model).as_deref(), Some("Small Office"));
    assert!((building.north_axis(&model) - 270.0).abs() < 1e-9);

    let story = model.get_by_name::<BuildingStory>("Ground").unwrap();
    assert_eq!(story.nominal_z_coordinate(&model), Some(0.0));
    let h = story.nominal_floor_to_floor_height(&model).unwrap();
    assert!((h - 3.048).abs() < 1e-9);
    assert_eq!(story.spaces(&model).len(), 2);

    let office = model.get_by_name::<Space>("Office").unwrap();
    let zone = office.thermal_zone(&model).unwrap();
    assert_eq!(zone.name(&model).as_deref(), Some("Zone A"));
    let storage = model.get_by_name::<Space>("Storage").unwrap();
    assert_eq!(
        storage.thermal_zone(&model).and_then(|z| z.name(&model)).as_deref(),
        Some("Storage ThermalZone")
    );
    assert_eq!(model.objects::<ThermalZone>().len(), 2);
}

#[test]
fn ip_materials_are_converted() {
    let (model, _) = translate();
    let gypsum = model.get_by_name::<StandardOpaqueMaterial>("Gypsum").unwrap();
    assert!((gypsum.thickness(&model) - 0.015875).abs() < 1e-9);
    assert!((gypsum.conductivity(&model) - 0.0926 * CONDUCTIVITY_IP_TO_SI).abs() < 1e-9);
    assert!((gypsum.density(&model) - 50.0 * DENSITY_IP_TO_SI).abs() < 1e-6);
    assert!((gypsum.specific_heat(&model) - 0.26 * SPECIFIC_HEAT_IP_TO_SI).abs() < 1e-6);

    let batt = model.get_by_name::<StandardOpaqueMaterial>("Batt").unwrap();
    let r_si = 13.0 / U_FACTOR_IP_TO_SI;
    assert!((batt.thermal_resistance(&model).unwrap() - r_si).abs() < 1e-9);

    let wall = model.get_by_name::<Construction>("Wall Cons").unwrap();
    let names: Vec<_> = wall
        .layers(&model)
        .into_iter()
        .filter_map(|l| l.name(&model))
        .collect();
    assert_eq!(names, ["Gypsum", "Batt"]);
    assert!(model.get_by_name::<Construction>("No Method").is_none());

    let glazing = model.get_by_name::<SimpleGlazing>("Dbl Clr Material").unwrap();
    assert!((glazing.u_factor(&model) - 0.5 * U_FACTOR_IP_TO_SI).abs() < 1e-9);
    assert_eq!(glazing.visible_transmittance(&model), Some(0.6));
}

#[test]
fn surfaces_and_openings() {
    let (model, _) = translate();
    let south = model.get_by_name::<Surface>("South Wall").unwrap();
    assert!((south.gross_area(&model) - 200.0 * SQ_FT).abs() < 1e-6);
    assert!((south.net_area(&model) - 129.0 * SQ_FT).abs() < 1e-6);
    assert_eq!(
        south.construction(&model).and_then(|c| c.name(&model)).as_deref(),
        Some("Wall Cons")
    );
    assert_eq!(south.outside_boundary_condition(&model), Some(BoundaryCondition::Outdoors));

    let window = model.get_by_name::<SubSurface>("Win 1").unwrap();
    assert_eq!(window.sub_surface_type(&model), Some(SubSurfaceType::FixedWindow));
    assert_eq!(
        window.construction(&model).and_then(|c| c.name(&model)).as_deref(),
        Some("Dbl Clr")
    );
    let door = model.get_by_name::<SubSurface>("Door 1").unwrap();
    assert_eq!(door.sub_surface_type(&model), Some(SubSurfaceType::Door));

    let slab = model.get_by_name::<Surface>("Slab").unwrap();
    assert_eq!(slab.surface_type(&model), Some(SurfaceType::Floor));
    assert_eq!(slab.outside_boundary_condition(&model), Some(BoundaryCondition::Ground));

    let lid = model.get_by_name::<Surface>("Lid").unwrap();
    assert_eq!(lid.surface_type(&model), Some(SurfaceType::RoofCeiling));
    assert_eq!(lid.outside_boundary_condition(&model), Some(BoundaryCondition::Outdoors));
}

#[test]
fn interior_wall_becomes_a_matched_pair() {
    let (model, _) = translate();
    let partition = model.get_by_name::<Surface>("Partition").unwrap();
    let copy = partition.adjacent_surface(&model).unwrap();
    assert_eq!(copy.name(&model).as_deref(), Some("Partition Reversed"));
    assert_eq!(copy.space(&model), model.get_by_name::<Space>("Storage"));
    assert_eq!(partition.outside_boundary_condition(&model), Some(BoundaryCondition::Surface));
}

#[test]
fn bad_elements_are_logged_and_skipped() {
    let (model, rt) = translate();
    // Unnamed Mat, ConsAssm without SpecMthd, Roof with a two-coordinate point.
    assert_eq!(rt.errors().len(), 3, "{:?}", rt.errors());
    assert!(model.get_by_name::<Surface>("Bad Roof").is_none());
    // South Wall, Slab, Lid, Partition and its copy.
    assert_eq!(model.objects::<Surface>().len(), 5);
}

#[test]
fn own_space_adjacency_is_left_adiabatic() {
    let wall = poly(&[[0., 0., 10.], [0., 0., 0.], [20., 0., 0.], [20., 0., 10.]]);
    let doc = format!(
        "<SDDXML><Proj><Bldg><Name>B</Name><Story><Name>S</Name><Spc><Name>A</Name>\
         <IntWall><Name>Self</Name><AdjacentSpcRef>A</AdjacentSpcRef>{wall}</IntWall>\
         </Spc></Story></Bldg></Proj></SDDXML>"
    );
    let mut rt = ReverseTranslator::new();
    let model = rt.translate_str(&doc).unwrap();
    let surface = model.get_by_name::<Surface>("Self").unwrap();
    assert_eq!(surface.outside_boundary_condition(&model), Some(BoundaryCondition::Adiabatic));
    assert!(surface.adjacent_surface(&model).is_none());
    assert_eq!(rt.errors().len(), 1);
}

#[test]
fn other_roots_and_missing_building_are_rejected() {
    let mut rt = ReverseTranslator::new();
    assert!(rt.translate_str("<gbXML lengthUnit=\"Feet\"></gbXML>").is_err());
    assert!(rt.translate_str("<SDDXML><Proj><Name>P</Name></Proj></SDDXML>").is_err());
}

#[test]
fn load_model_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("os-sdd-{}.xml", std::process::id()));
    std::fs::write(&path, office_document()).unwrap();
    let mut rt = ReverseTranslator::new();
    let model = rt.load_model(&path).unwrap();
    assert!(model.get_by_name::<Surface>("South Wall").is_some());
    std::fs::remove_file(&path).ok();
}
