use os_model::{
    BoundaryCondition, Construction, Model, ModelError, ModelObject, Schedule, Space, Surface,
    ThermalZone, example_model,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("os-model-{}-{name}", std::process::id()))
}

#[test]
fn new_model_has_one_version() {
    let model = Model::new();
    assert_eq!(model.version().to_string(), "1.2.0");
    assert_eq!(model.workspace().objects_by_type("OS:Version").len(), 1);
}

#[test]
fn version_object_cannot_be_removed() {
    let mut model = Model::new();
    let id = model.workspace().objects_by_type("OS:Version")[0];
    assert!(matches!(model.remove_object(id), Err(ModelError::Protected(_))));
}

#[test]
fn save_and_load_keeps_handles_and_links() {
    let model = example_model().unwrap();
    let path = temp_path("example.osm");
    model.save(&path).unwrap();

    let loaded = Model::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(
        loaded.workspace().num_objects(),
        model.workspace().num_objects()
    );
    let zone = model.objects::<ThermalZone>()[0];
    let handle = zone.handle(&model).unwrap();
    let loaded_zone: ThermalZone = loaded.get(handle).unwrap();
    assert_eq!(loaded_zone.name(&loaded), zone.name(&model));

    let space = loaded.objects::<Space>()[0];
    assert_eq!(space.thermal_zone(&loaded), Some(loaded_zone));
    assert_eq!(space.surfaces(&loaded).len(), 6);
    assert!((space.floor_area(&loaded) - 100.0).abs() < 1e-9);

    let people = space.people(&loaded)[0];
    assert!(matches!(
        people.number_of_people_schedule(&loaded),
        Some(Schedule::Year(_))
    ));
}

#[test]
fn parse_reports_bad_models() {
    let text = "OS:Version,\n  {8b1c8e3a-8d3b-4b88-9a0e-3f3b0d6e2a11}, !- Handle\n  1.2.0;\n\n\
                OS:Timestep,\n  {1b6f3a2e-7a0c-4d8e-9f5b-2c9d1e0f4a77}, !- Handle\n  99;\n";
    assert!(Model::parse(text).is_err());
}

#[test]
fn parse_adds_missing_version() {
    let text = "OS:ThermalZone,\n  {4f0e6a21-2b55-4a6f-8d9e-7c3b1a2f5e10}, !- Handle\n  Core;\n";
    let model = Model::parse(text).unwrap();
    assert_eq!(model.workspace().objects_by_type("OS:Version").len(), 1);
    assert!(model.get_by_name::<ThermalZone>("Core").is_some());
}

#[test]
fn renaming_construction_shows_in_surfaces() {
    let mut model = example_model().unwrap();
    let c: Construction = model.get_by_name("Exterior Wall").unwrap();
    c.set_name(&mut model, "Heavy Wall").unwrap();
    let floor: Surface = model.get_by_name("Floor").unwrap();
    let text = model.workspace().get_string(floor.id(), os_model::fields::surface::CONSTRUCTION_NAME);
    assert_eq!(text.as_deref(), Some("Heavy Wall"));

    c.remove(&mut model).unwrap();
    assert_eq!(floor.construction(&model), None);
}

#[test]
fn names_are_made_unique() {
    let mut model = Model::new();
    let a = ThermalZone::new(&mut model).unwrap();
    let b = ThermalZone::new(&mut model).unwrap();
    assert_eq!(a.name(&model).as_deref(), Some("Thermal Zone 1"));
    assert_eq!(b.name(&model).as_deref(), Some("Thermal Zone 2"));
    let set = b.set_name(&mut model, "Thermal Zone 1").unwrap();
    assert_eq!(set, "Thermal Zone 3");
}

#[test]
fn interzone_walls_match_across_spaces() {
    let mut model = Model::new();
    let west = Space::new(&mut model).unwrap();
    let east = Space::new(&mut model).unwrap();
    east.set_origin(&mut model, os_model::Vector3d::new(10.0, 0.0, 0.0))
        .unwrap();

    let p = os_model::Point3d::new;
    // East face of the west space; west face of the east space in its own coordinates.
    let a = Surface::new(
        &mut model,
        &[p(10.0, 0.0, 3.0), p(10.0, 0.0, 0.0), p(10.0, 10.0, 0.0), p(10.0, 10.0, 3.0)],
    )
    .unwrap();
    a.set_space(&mut model, west).unwrap();
    let b = Surface::new(
        &mut model,
        &[p(0.0, 10.0, 3.0), p(0.0, 10.0, 0.0), p(0.0, 0.0, 0.0), p(0.0, 0.0, 3.0)],
    )
    .unwrap();
    b.set_space(&mut model, east).unwrap();

    assert!(a.matches(&model, b));
    a.set_adjacent_surface(&mut model, b).unwrap();
    assert_eq!(b.outside_boundary_condition(&model), Some(BoundaryCondition::Surface));
}

#[test]
fn adjacent_copy_lands_in_other_space() {
    let mut model = Model::new();
    let below = Space::new(&mut model).unwrap();
    let above = Space::new(&mut model).unwrap();
    above
        .set_origin(&mut model, os_model::Vector3d::new(0.0, 0.0, 3.0))
        .unwrap();

    let p = os_model::Point3d::new;
    let ceiling = Surface::new(
        &mut model,
        &[p(0.0, 0.0, 3.0), p(4.0, 0.0, 3.0), p(4.0, 4.0, 3.0), p(0.0, 4.0, 3.0)],
    )
    .unwrap();
    ceiling.set_name(&mut model, "Slab").unwrap();
    ceiling.set_space(&mut model, below).unwrap();
    let hatch = os_model::SubSurface::new(
        &mut model,
        &[p(1.0, 1.0, 3.0), p(2.0, 1.0, 3.0), p(2.0, 2.0, 3.0), p(1.0, 2.0, 3.0)],
    )
    .unwrap();
    hatch.set_surface(&mut model, ceiling).unwrap();

    let floor = ceiling.create_adjacent_surface(&mut model, above).unwrap();
    assert_eq!(floor.space(&model), Some(above));
    assert_eq!(floor.name(&model).as_deref(), Some("Slab Reversed"));
    assert_eq!(floor.surface_type(&model), Some(os_model::SurfaceType::Floor));
    assert!(floor.vertices(&model).iter().all(|v| v.z.abs() < 1e-9));
    assert_eq!(ceiling.adjacent_surface(&model), Some(floor));
    assert!(ceiling.matches(&model, floor));

    let copies = floor.sub_surfaces(&model);
    assert_eq!(copies.len(), 1);
    assert_eq!(hatch.adjacent_sub_surface(&model), Some(copies[0]));

    assert!(ceiling.create_adjacent_surface(&mut model, below).is_err());
}
