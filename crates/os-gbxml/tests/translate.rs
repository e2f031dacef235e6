use os_core::units::LengthUnit;
use os_gbxml::schema::GbXml;
use os_gbxml::{ForwardTranslator, ReverseTranslator};
use os_model::{
    BoundaryCondition, Construction, Material, Model, ModelObject, Point3d, ShadingSurface,
    ShadingSurfaceGroup, ShadingSurfaceType, Space, SubSurface, SubSurfaceType, Surface,
    SurfaceType, example_model,
};

const FEET_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gbXML xmlns="http://www.gbxml.org/schema" temperatureUnit="F" lengthUnit="Feet" areaUnit="SquareFeet" volumeUnit="CubicFeet" useSIUnitsForResults="true" version="6.01">
  <Campus id="campus-1">
    <Name>Campus</Name>
    <Location>
      <Name>Golden, CO</Name>
      <Latitude>39.74</Latitude>
      <Longitude>-105.18</Longitude>
      <Elevation>100</Elevation>
    </Location>
    <Building id="bldg-1" buildingType="Office">
      <Name>Two Rooms</Name>
      <Area>200</Area>
      <Space id="sp-1" zoneIdRef="zone-1" buildingStoreyIdRef="storey-1">
        <Name>Core</Name>
      </Space>
      <Space id="sp-2">
        <Name>Upper</Name>
      </Space>
      <BuildingStorey id="storey-1">
        <Name>Level 1</Name>
        <Level>10</Level>
      </BuildingStorey>
    </Building>
    <Surface id="wall-1" surfaceType="ExteriorWall" constructionIdRef="con-1" exposedToSun="true">
      <Name>South Wall</Name>
      <AdjacentSpaceId spaceIdRef="sp-1"/>
      <PlanarGeometry>
        <PolyLoop>
          <CartesianPoint><Coordinate>0</Coordinate><Coordinate>0</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>0</Coordinate><Coordinate>0</Coordinate><Coordinate>0</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>10</Coordinate><Coordinate>0</Coordinate><Coordinate>0</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>10</Coordinate><Coordinate>0</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
        </PolyLoop>
      </PlanarGeometry>
      <Opening id="win-a" openingType="FixedWindow" windowTypeIdRef="win-1">
        <Name>South Window</Name>
        <PlanarGeometry>
          <PolyLoop>
            <CartesianPoint><Coordinate>2</Coordinate><Coordinate>0</Coordinate><Coordinate>7</Coordinate></CartesianPoint>
            <CartesianPoint><Coordinate>2</Coordinate><Coordinate>0</Coordinate><Coordinate>3</Coordinate></CartesianPoint>
            <CartesianPoint><Coordinate>8</Coordinate><Coordinate>0</Coordinate><Coordinate>3</Coordinate></CartesianPoint>
            <CartesianPoint><Coordinate>8</Coordinate><Coordinate>0</Coordinate><Coordinate>7</Coordinate></CartesianPoint>
          </PolyLoop>
        </PlanarGeometry>
      </Opening>
    </Surface>
    <Surface id="shade-1" surfaceType="Shade" constructionIdRef="con-1" exposedToSun="true">
      <Name>Overhang</Name>
      <PlanarGeometry>
        <PolyLoop>
          <CartesianPoint><Coordinate>0</Coordinate><Coordinate>0</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>0</Coordinate><Coordinate>-3</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>10</Coordinate><Coordinate>-3</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>10</Coordinate><Coordinate>0</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
        </PolyLoop>
      </PlanarGeometry>
    </Surface>
    <Surface id="floor-2" surfaceType="InteriorFloor">
      <Name>Upper Floor</Name>
      <AdjacentSpaceId spaceIdRef="sp-2" surfaceType="InteriorFloor"/>
      <AdjacentSpaceId spaceIdRef="sp-1" surfaceType="Ceiling"/>
      <PlanarGeometry>
        <PolyLoop>
          <CartesianPoint><Coordinate>0</Coordinate><Coordinate>0</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>0</Coordinate><Coordinate>10</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>10</Coordinate><Coordinate>10</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>10</Coordinate><Coordinate>0</Coordinate><Coordinate>10</Coordinate></CartesianPoint>
        </PolyLoop>
      </PlanarGeometry>
    </Surface>
    <Surface id="roof-x" surfaceType="Roof" exposedToSun="true">
      <Name>Loose Roof</Name>
      <PlanarGeometry>
        <PolyLoop>
          <CartesianPoint><Coordinate>0</Coordinate><Coordinate>0</Coordinate><Coordinate>20</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>10</Coordinate><Coordinate>0</Coordinate><Coordinate>20</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>10</Coordinate><Coordinate>10</Coordinate><Coordinate>20</Coordinate></CartesianPoint>
          <CartesianPoint><Coordinate>0</Coordinate><Coordinate>10</Coordinate><Coordinate>20</Coordinate></CartesianPoint>
        </PolyLoop>
      </PlanarGeometry>
    </Surface>
  </Campus>
  <Construction id="con-1">
    <LayerId layerIdRef="layer-1"/>
    <Name>Wall Assembly</Name>
  </Construction>
  <Layer id="layer-1">
    <MaterialId materialIdRef="mat-1"/>
    <MaterialId materialIdRef="mat-2"/>
  </Layer>
  <Material id="mat-1">
    <Name>Concrete</Name>
    <Thickness unit="Meters">0.1</Thickness>
    <Conductivity unit="WPerMeterK">1.0</Conductivity>
    <Density unit="KgPerCubicM">2000</Density>
    <SpecificHeat unit="JPerKgK">900</SpecificHeat>
  </Material>
  <Material id="mat-2">
    <Name>Board</Name>
    <R-value unit="SquareMeterKPerW">2.0</R-value>
  </Material>
  <WindowType id="win-1">
    <Name>Double Pane</Name>
    <U-value unit="WPerSquareMeterK">2.5</U-value>
    <SolarHeatGainCoeff unit="Fraction">0.5</SolarHeatGainCoeff>
    <Transmittance type="Visible" unit="Fraction">0.6</Transmittance>
  </WindowType>
  <Zone id="zone-1">
    <Name>Core Zone</Name>
  </Zone>
</gbXML>
"#;

const SQFT: f64 = 0.3048 * 0.3048;

fn by_name<T: ModelObject>(model: &Model, name: &str) -> T {
    model
        .get_by_name::<T>(name)
        .unwrap_or_else(|| panic!("no object named '{name}'"))
}

#[test]
fn feet_document_is_scaled_and_linked() {
    let mut translator = ReverseTranslator::new();
    let model = translator.translate_str(FEET_DOCUMENT).unwrap();
    assert!(translator.errors().is_empty(), "{:?}", translator.errors());

    let warnings: Vec<String> = translator
        .warnings()
        .into_iter()
        .map(|w| w.message)
        .collect();
    assert!(
        warnings
            .iter()
            .any(|w| w.contains("'Loose Roof' has no adjacent space and will not be translated"))
    );
    assert!(model.get_by_name::<Surface>("Loose Roof").is_none());
    assert!(!warnings.iter().any(|w| w.contains("temperature")));

    let wall: Surface = by_name(&model, "South Wall");
    assert!((wall.gross_area(&model) - 100.0 * SQFT).abs() < 1e-9);
    assert!((wall.net_area(&model) - 76.0 * SQFT).abs() < 1e-9);
    assert_eq!(wall.outside_boundary_condition(&model), Some(BoundaryCondition::Outdoors));
    let assembly = wall.construction(&model).unwrap();
    assert_eq!(assembly.name(&model).as_deref(), Some("Wall Assembly"));
    let layers = assembly.layers(&model);
    assert_eq!(layers.len(), 2);
    let Material::Opaque(board) = layers[1] else {
        panic!("board should be opaque");
    };
    assert!((board.conductivity(&model) - 0.0127).abs() < 1e-12);

    let window: SubSurface = by_name(&model, "South Window");
    assert_eq!(window.surface(&model), Some(wall));
    assert_eq!(window.sub_surface_type(&model), Some(SubSurfaceType::FixedWindow));
    let glazing: Construction = window.construction(&model).unwrap();
    assert_eq!(glazing.name(&model).as_deref(), Some("Double Pane"));
    assert!(glazing.is_fenestration(&model));

    let core: Space = by_name(&model, "Core");
    let core_zone = core.thermal_zone(&model).unwrap();
    assert_eq!(core_zone.name(&model).as_deref(), Some("Core Zone"));
    let story = core.building_story(&model).unwrap();
    assert!((story.nominal_z_coordinate(&model).unwrap() - 3.048).abs() < 1e-9);
    let upper: Space = by_name(&model, "Upper");
    let upper_zone = upper.thermal_zone(&model).unwrap();
    assert_eq!(upper_zone.name(&model).as_deref(), Some("Upper ThermalZone"));

    let floor: Surface = by_name(&model, "Upper Floor");
    assert_eq!(floor.space(&model), Some(upper));
    assert_eq!(floor.surface_type(&model), Some(SurfaceType::Floor));
    let ceiling = floor.adjacent_surface(&model).unwrap();
    assert_eq!(ceiling.name(&model).as_deref(), Some("Upper Floor Reversed"));
    assert_eq!(ceiling.space(&model), Some(core));
    assert_eq!(ceiling.surface_type(&model), Some(SurfaceType::RoofCeiling));
    assert!(floor.matches(&model, ceiling));

    assert_eq!(model.objects::<Surface>().len(), 3);

    let overhang: ShadingSurface = by_name(&model, "Overhang");
    let group = overhang.shading_surface_group(&model).unwrap();
    assert_eq!(group.shading_surface_type(&model), Some(ShadingSurfaceType::Building));
    assert_eq!(overhang.construction(&model), Some(assembly));
    assert!((overhang.gross_area(&model) - 30.0 * SQFT).abs() < 1e-9);
    assert_eq!(model.objects::<ShadingSurfaceGroup>().len(), 1);
    let site = model.get_site().unwrap();
    assert!((site.elevation(&model) - 30.48).abs() < 1e-6);
    let building = model.get_building().unwrap();
    assert_eq!(building.name(&model).as_deref(), Some("Two Rooms"));
    assert_eq!(building.standards_building_type(&model).as_deref(), Some("Office"));
}

#[test]
fn length_unit_override_wins() {
    let mut translator = ReverseTranslator::new();
    translator.set_length_unit_override(Some(LengthUnit::Meters));
    let model = translator.translate_str(FEET_DOCUMENT).unwrap();
    let wall: Surface = by_name(&model, "South Wall");
    assert!((wall.gross_area(&model) - 100.0).abs() < 1e-9);
}

#[test]
fn missing_units_are_reported() {
    let doc = r#"<gbXML><Campus id="c"><Building id="b"><Space id="s"/></Building></Campus></gbXML>"#;
    let mut translator = ReverseTranslator::new();
    let model = translator.translate_str(doc).unwrap();
    let warnings: Vec<String> = translator
        .warnings()
        .into_iter()
        .map(|w| w.message)
        .collect();
    assert!(warnings.iter().any(|w| w == "No length unit specified, using Meters"));
    assert!(warnings.iter().any(|w| w.contains("temperature unit")));
    assert_eq!(model.objects::<Space>().len(), 1);
}

#[test]
fn surface_with_three_spaces_is_rejected() {
    let doc = FEET_DOCUMENT.replace(
        r#"<AdjacentSpaceId spaceIdRef="sp-1" surfaceType="Ceiling"/>"#,
        r#"<AdjacentSpaceId spaceIdRef="sp-1" surfaceType="Ceiling"/><AdjacentSpaceId spaceIdRef="sp-1"/>"#,
    );
    let mut translator = ReverseTranslator::new();
    let model = translator.translate_str(&doc).unwrap();
    let errors = translator.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("more than two adjacent spaces"));
    assert!(model.get_by_name::<Surface>("Upper Floor").is_none());
    assert_eq!(model.objects::<Surface>().len(), 1);
}

#[test]
fn surface_with_the_same_space_on_both_sides_is_skipped() {
    let doc = FEET_DOCUMENT.replace(
        r#"<AdjacentSpaceId spaceIdRef="sp-1" surfaceType="Ceiling"/>"#,
        r#"<AdjacentSpaceId spaceIdRef="sp-2" surfaceType="Ceiling"/>"#,
    );
    let mut translator = ReverseTranslator::new();
    let model = translator.translate_str(&doc).unwrap();
    assert!(translator.errors().is_empty(), "{:?}", translator.errors());
    assert!(translator.warnings().iter().any(|w| {
        w.message
            .contains("'Upper Floor' lists space 'sp-2' as both of its sides and will not be translated")
    }));
    assert!(model.get_by_name::<Surface>("Upper Floor").is_none());
    assert!(model.get_by_name::<Surface>("Upper Floor Reversed").is_none());
    assert_eq!(model.objects::<Surface>().len(), 1);
}

#[test]
fn shades_share_an_existing_building_group() {
    let doc = FEET_DOCUMENT.replace(
        r#"<Surface id="roof-x" surfaceType="Roof" exposedToSun="true">
      <Name>Loose Roof</Name>"#,
        r#"<Surface id="roof-x" surfaceType="Shade">
      <Name>Canopy</Name>"#,
    );
    let mut translator = ReverseTranslator::new();
    let model = translator.translate_str(&doc).unwrap();
    assert!(translator.errors().is_empty(), "{:?}", translator.errors());

    let groups = model.objects::<ShadingSurfaceGroup>();
    assert_eq!(groups.len(), 1);
    let names: Vec<String> = groups[0]
        .shading_surfaces(&model)
        .into_iter()
        .filter_map(|s| s.name(&model))
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().any(|n| n == "Overhang"));
    assert!(names.iter().any(|n| n == "Canopy"));
    let canopy: ShadingSurface = by_name(&model, "Canopy");
    assert_eq!(canopy.construction(&model), None);
}

#[test]
fn malformed_document_is_an_error() {
    let mut translator = ReverseTranslator::new();
    assert!(translator.translate_str("<gbXML lengthUnit=Feet>").is_err());
}

#[test]
fn example_model_round_trips() {
    let model = example_model().unwrap();
    let mut forward = ForwardTranslator::new();
    let text = forward.model_to_gbxml_string(&model).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains(r#"lengthUnit="Meters""#));
    assert!(text.contains(r#"surfaceType="SlabOnGrade""#));
    assert!(forward.warnings().is_empty(), "{:?}", forward.warnings());

    let mut reverse = ReverseTranslator::new();
    let back = reverse.translate_str(&text).unwrap();
    assert!(reverse.warnings().is_empty(), "{:?}", reverse.warnings());
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());

    assert_eq!(back.objects::<Surface>().len(), 6);
    let south: Surface = by_name(&back, "South Wall");
    assert!((south.net_area(&back) - 24.0).abs() < 1e-9);
    let exterior = south.construction(&back).unwrap();
    assert_eq!(exterior.name(&back).as_deref(), Some("Exterior Wall"));
    let names: Vec<String> = exterior
        .layers(&back)
        .iter()
        .filter_map(|m| m.name(&back))
        .collect();
    assert_eq!(names, ["Brick", "Insulation"]);

    let window: SubSurface = by_name(&back, "South Window");
    let window_construction = window.construction(&back).unwrap();
    assert_eq!(window_construction.name(&back).as_deref(), Some("Exterior Window"));

    let floor: Surface = by_name(&back, "Floor");
    assert_eq!(floor.outside_boundary_condition(&back), Some(BoundaryCondition::Ground));
    let roof: Surface = by_name(&back, "Roof");
    assert_eq!(roof.outside_boundary_condition(&back), Some(BoundaryCondition::Outdoors));

    let space = back.objects::<Space>()[0];
    assert!((space.floor_area(&back) - 100.0).abs() < 1e-9);
    let zone = space.thermal_zone(&back).unwrap();
    assert_eq!(zone.name(&back).as_deref(), Some("Thermal Zone 1"));
    let site = back.get_site().unwrap();
    assert!((site.latitude(&back) - 39.74).abs() < 1e-12);
}

#[test]
fn matched_pair_is_written_once() {
    let mut model = Model::new();
    let m = &mut model;
    let lower = Space::new(m).unwrap();
    let upper = Space::new(m).unwrap();
    let slab = Surface::new(
        m,
        &[
            Point3d::new(0.0, 0.0, 3.0),
            Point3d::new(4.0, 0.0, 3.0),
            Point3d::new(4.0, 4.0, 3.0),
            Point3d::new(0.0, 4.0, 3.0),
        ],
    )
    .unwrap();
    slab.set_name(m, "Slab").unwrap();
    slab.set_space(m, lower).unwrap();
    slab.create_adjacent_surface(m, upper).unwrap();

    let doc: GbXml = ForwardTranslator::new().translate_model(&model);
    let campus = doc.campus.as_ref().unwrap();
    assert_eq!(campus.surfaces.len(), 1);
    let surface = &campus.surfaces[0];
    assert_eq!(surface.surface_type.as_deref(), Some("Ceiling"));
    let sides: Vec<Option<&str>> = surface
        .adjacent_spaces
        .iter()
        .map(|a| a.surface_type.as_deref())
        .collect();
    assert_eq!(sides, [Some("Ceiling"), Some("InteriorFloor")]);

    let mut reverse = ReverseTranslator::new();
    let back = reverse.translate_document(&doc).unwrap();
    let slab: Surface = by_name(&back, "Slab");
    assert_eq!(slab.surface_type(&back), Some(SurfaceType::RoofCeiling));
    let other = slab.adjacent_surface(&back).unwrap();
    assert_eq!(other.surface_type(&back), Some(SurfaceType::Floor));
    assert_ne!(slab.space(&back), other.space(&back));
}

#[test]
fn shading_surfaces_round_trip_as_shades() {
    let mut model = example_model().unwrap();
    let group = ShadingSurfaceGroup::building_group(&mut model).unwrap();
    let overhang = [
        Point3d::new(0.0, 0.0, 3.0),
        Point3d::new(0.0, -1.0, 3.0),
        Point3d::new(4.0, -1.0, 3.0),
        Point3d::new(4.0, 0.0, 3.0),
    ];
    let shade = ShadingSurface::new(&mut model, &overhang).unwrap();
    shade.set_name(&mut model, "South Overhang").unwrap();
    shade.set_shading_surface_group(&mut model, group).unwrap();

    let mut forward = ForwardTranslator::new();
    let text = forward.model_to_gbxml_string(&model).unwrap();
    assert!(text.contains(r#"surfaceType="Shade""#));

    let mut reverse = ReverseTranslator::new();
    let back = reverse.translate_str(&text).unwrap();
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());
    assert_eq!(back.objects::<Surface>().len(), 6);
    let shade_back: ShadingSurface = by_name(&back, "South Overhang");
    assert!((shade_back.gross_area(&back) - 4.0).abs() < 1e-9);
    let group_back = shade_back.shading_surface_group(&back).unwrap();
    assert_eq!(group_back.shading_surface_type(&back), Some(ShadingSurfaceType::Building));
}
