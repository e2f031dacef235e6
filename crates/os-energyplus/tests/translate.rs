use chrono::{NaiveDate, TimeDelta};
use os_energyplus::{ForwardTranslator, ForwardTranslatorOptions, ReverseTranslator};
use os_idf::{IddFileType, IdfFile, Workspace};
use os_model::{
    BASE_YEAR, BoundaryCondition, Lights, Model, ModelObject, People, Point3d, ScheduleYear,
    ShadingSurface, ShadingSurfaceGroup, ShadingSurfaceType, Space, SubSurface, SubSurfaceType,
    Surface, SurfaceType, ThermalZone, Vector3d, example_model,
};

fn forward(model: &Model) -> (Workspace, ForwardTranslator) {
    let mut ft = ForwardTranslator::new();
    let ws = ft.translate_model(model).unwrap();
    (ws, ft)
}

fn field(ws: &Workspace, type_name: &str, name: &str, index: usize) -> Option<String> {
    let id = ws.object_by_type_and_name(type_name, name)?;
    ws.get_string(id, index)
}

#[test]
fn example_model_translates_in_order() {
    let model = example_model().unwrap();
    let (ws, ft) = forward(&model);
    assert!(ft.errors().is_empty(), "{:?}", ft.errors());

    let order: Vec<String> = ws
        .object_ids()
        .into_iter()
        .filter_map(|id| ws.type_name(id).map(str::to_string))
        .collect();
    let position = |t: &str| order.iter().position(|o| o == t).unwrap();
    assert_eq!(position("Version"), 0);
    assert!(position("Timestep") < position("Building"));
    assert!(position("Site:Location") < position("RunPeriod"));
    assert!(position("GlobalGeometryRules") < position("ScheduleTypeLimits"));
    assert!(position("Construction") < position("Zone"));
    assert!(position("BuildingSurface:Detailed") < position("FenestrationSurface:Detailed"));
    assert!(position("People") < position("Output:SQLite"));

    assert_eq!(ws.objects_by_type("Zone").len(), 1);
    assert_eq!(ws.objects_by_type("BuildingSurface:Detailed").len(), 6);
    assert_eq!(field(&ws, "BuildingSurface:Detailed", "Roof", 1).as_deref(), Some("Roof"));
    assert_eq!(field(&ws, "BuildingSurface:Detailed", "Floor", 4).as_deref(), Some("Ground"));
    assert_eq!(
        field(&ws, "FenestrationSurface:Detailed", "South Window", 3).as_deref(),
        Some("South Wall")
    );
    assert_eq!(
        field(&ws, "FenestrationSurface:Detailed", "South Window", 1).as_deref(),
        Some("Window")
    );
    let site = ws.objects_by_type("Site:Location")[0];
    assert_eq!(ws.get_string(site, 1).as_deref(), Some("39.74"));

    let day = ws.object_by_type_and_name("Schedule:Day:Interval", "Office Weekday").unwrap();
    assert_eq!(ws.get_string(day, 3).as_deref(), Some("Until: 08:00"));
    assert_eq!(ws.get_string(day, 5).as_deref(), Some("Until: 18:00"));
    assert_eq!(ws.get_string(day, 7).as_deref(), Some("Until: 24:00"));

    let year = ws.object_by_type_and_name("Schedule:Year", "Office Occupancy").unwrap();
    let group = ws.extensible_group(year, 0).unwrap();
    let texts: Vec<&str> = group.iter().map(|v| v.as_deref().unwrap_or("")).collect();
    assert_eq!(texts, vec!["Office Week", "1", "1", "12", "31"]);

    let people = ws.objects_by_type("People")[0];
    assert_eq!(ws.get_string(people, 2).as_deref(), Some("Office Occupancy"));
    assert_eq!(ws.get_string(people, 9).as_deref(), Some("Office Activity"));
}

#[test]
fn output_requests_follow_options() {
    let model = Model::new();
    let mut ft = ForwardTranslator::with_options(ForwardTranslatorOptions {
        exclude_sqlite_output_report: true,
        exclude_html_output_report: true,
        ip_tabular_output: false,
        exclude_variable_dictionary: true,
    });
    let ws = ft.translate_model(&model).unwrap();
    for t in [
        "Output:SQLite",
        "Output:Table:SummaryReports",
        "OutputControl:Table:Style",
        "Output:VariableDictionary",
    ] {
        assert!(ws.objects_by_type(t).is_empty(), "{t}");
    }

    ft.set_options(ForwardTranslatorOptions {
        ip_tabular_output: true,
        ..ForwardTranslatorOptions::default()
    });
    let ws = ft.translate_model(&model).unwrap();
    let style = ws.objects_by_type("OutputControl:Table:Style")[0];
    assert_eq!(ws.get_string(style, 0).as_deref(), Some("HTML"));
    assert_eq!(ws.get_string(style, 1).as_deref(), Some("InchPound"));
    assert_eq!(ws.objects_by_type("Output:VariableDictionary").len(), 1);
}

#[test]
fn spaces_without_zone_are_skipped() {
    let mut model = example_model().unwrap();
    let space = Space::new(&mut model).unwrap();
    space.set_name(&mut model, "Attic").unwrap();
    let outline = [
        Point3d::new(0.0, 0.0, 3.0),
        Point3d::new(0.0, 10.0, 3.0),
        Point3d::new(10.0, 10.0, 3.0),
        Point3d::new(10.0, 0.0, 3.0),
    ];
    let attic_floor = Surface::new(&mut model, &outline).unwrap();
    attic_floor.set_name(&mut model, "Attic Floor").unwrap();
    attic_floor.set_space(&mut model, space).unwrap();

    let (ws, ft) = forward(&model);
    assert!(ft.warnings().iter().any(|w| w.message.contains("'Attic'")));
    assert!(ws.object_by_type_and_name("BuildingSurface:Detailed", "Attic Floor").is_none());
    assert_eq!(ws.objects_by_type("BuildingSurface:Detailed").len(), 6);
}

#[test]
fn incomplete_year_schedule_is_not_translated() {
    let mut model = example_model().unwrap();
    let year = model.get_by_name::<ScheduleYear>("Office Occupancy").unwrap();
    let week = year.weeks(&model)[0].1;
    year.clear_weeks(&mut model).unwrap();
    year.add_week(&mut model, NaiveDate::from_ymd_opt(BASE_YEAR, 6, 30).unwrap(), week)
        .unwrap();

    let (ws, ft) = forward(&model);
    assert!(ws.objects_by_type("Schedule:Year").is_empty());
    assert!(ft.errors().iter().any(|e| e.message.contains("Office Occupancy")));
    // Both loads depend on the schedule.
    assert!(ws.objects_by_type("People").is_empty());
    assert!(ws.objects_by_type("Lights").is_empty());
}

#[test]
fn year_periods_start_after_the_previous_end() {
    let mut model = example_model().unwrap();
    let year = model.get_by_name::<ScheduleYear>("Office Occupancy").unwrap();
    let week = year.weeks(&model)[0].1;
    year.clear_weeks(&mut model).unwrap();
    for (m, d) in [(12, 31), (3, 31), (9, 30)] {
        year.add_week(&mut model, NaiveDate::from_ymd_opt(BASE_YEAR, m, d).unwrap(), week)
            .unwrap();
    }

    let (ws, ft) = forward(&model);
    assert!(ft.errors().is_empty(), "{:?}", ft.errors());
    let id = ws.object_by_type_and_name("Schedule:Year", "Office Occupancy").unwrap();
    let periods: Vec<Vec<String>> = (0..3)
        .map(|i| {
            ws.extensible_group(id, i)
                .unwrap()
                .into_iter()
                .map(|v| v.unwrap_or_default())
                .collect()
        })
        .collect();
    assert_eq!(periods[0], ["Office Week", "1", "1", "3", "31"]);
    assert_eq!(periods[1], ["Office Week", "4", "1", "9", "30"]);
    assert_eq!(periods[2], ["Office Week", "10", "1", "12", "31"]);
    assert!(ws.extensible_group(id, 3).is_none());
}

#[test]
fn example_model_round_trips_through_idf_text() {
    let model = example_model().unwrap();
    let (ws, _) = forward(&model);
    let text = ws.print();

    let file = IdfFile::parse(&text, IddFileType::EnergyPlus).unwrap();
    let mut rt = ReverseTranslator::new();
    let back = rt.translate_idf_file(&file).unwrap();
    assert!(rt.errors().is_empty(), "{:?}", rt.errors());

    assert_eq!(back.objects::<ThermalZone>().len(), 1);
    let space = back.objects::<Space>()[0];
    assert!((space.floor_area(&back) - 100.0).abs() < 1e-6);

    let surfaces = back.objects::<Surface>();
    assert_eq!(surfaces.len(), 6);
    let roof = back.get_by_name::<Surface>("Roof").unwrap();
    assert_eq!(roof.surface_type(&back), Some(SurfaceType::RoofCeiling));
    assert_eq!(roof.outside_boundary_condition(&back), Some(BoundaryCondition::Outdoors));
    let south = back.get_by_name::<Surface>("South Wall").unwrap();
    assert!((south.net_area(&back) - 24.0).abs() < 1e-6);
    assert_eq!(south.construction(&back).and_then(|c| c.name(&back)).as_deref(), Some("Exterior Wall"));

    let window = back.get_by_name::<SubSurface>("South Window").unwrap();
    assert_eq!(window.sub_surface_type(&back), Some(SubSurfaceType::FixedWindow));
    assert_eq!(window.surface(&back), Some(south));

    let people = back.objects::<People>()[0];
    assert_eq!(people.number_of_people(&back), 8.0);
    let lights = back.objects::<Lights>()[0];
    assert_eq!(lights.lighting_level(&back), 900.0);

    let year = back.get_by_name::<ScheduleYear>("Office Occupancy").unwrap();
    year.check_coverage(&back).unwrap();
    // 2009-01-05 is a Monday.
    let monday = NaiveDate::from_ymd_opt(BASE_YEAR, 1, 5).unwrap();
    assert_eq!(year.value_at(&back, monday, TimeDelta::hours(12)), Some(0.9));
    assert_eq!(year.value_at(&back, monday, TimeDelta::hours(6)), Some(0.05));
}

#[test]
fn interzone_walls_are_relinked() {
    let mut model = Model::new();
    let mut walls = Vec::new();
    for (name, outline) in [
        (
            "Left Wall",
            vec![
                Point3d::new(5.0, 0.0, 3.0),
                Point3d::new(5.0, 0.0, 0.0),
                Point3d::new(5.0, 5.0, 0.0),
                Point3d::new(5.0, 5.0, 3.0),
            ],
        ),
        (
            "Right Wall",
            vec![
                Point3d::new(5.0, 5.0, 3.0),
                Point3d::new(5.0, 5.0, 0.0),
                Point3d::new(5.0, 0.0, 0.0),
                Point3d::new(5.0, 0.0, 3.0),
            ],
        ),
    ] {
        let zone = ThermalZone::new(&mut model).unwrap();
        let space = Space::new(&mut model).unwrap();
        space.set_thermal_zone(&mut model, zone).unwrap();
        let wall = Surface::new(&mut model, &outline).unwrap();
        wall.set_name(&mut model, name).unwrap();
        wall.set_space(&mut model, space).unwrap();
        walls.push(wall);
    }
    walls[0].set_adjacent_surface(&mut model, walls[1]).unwrap();

    let (ws, _) = forward(&model);
    assert_eq!(field(&ws, "BuildingSurface:Detailed", "Left Wall", 5).as_deref(), Some("Right Wall"));

    let mut rt = ReverseTranslator::new();
    let back = rt.translate_workspace(&ws).unwrap();
    let left = back.get_by_name::<Surface>("Left Wall").unwrap();
    let right = back.get_by_name::<Surface>("Right Wall").unwrap();
    assert_eq!(left.adjacent_surface(&back), Some(right));
    assert_eq!(right.adjacent_surface(&back), Some(left));
    assert_eq!(left.outside_boundary_condition(&back), Some(BoundaryCondition::Surface));
}

#[test]
fn shading_surfaces_are_written_by_group_type() {
    let awning = [
        Point3d::new(0.0, 0.0, 3.0),
        Point3d::new(0.0, -1.0, 3.0),
        Point3d::new(2.0, -1.0, 3.0),
        Point3d::new(2.0, 0.0, 3.0),
    ];
    let mut model = Model::new();
    let zone = ThermalZone::new(&mut model).unwrap();
    let space = Space::new(&mut model).unwrap();
    space.set_thermal_zone(&mut model, zone).unwrap();
    space.set_origin(&mut model, Vector3d::new(10.0, 0.0, 0.0)).unwrap();
    let space_group = ShadingSurfaceGroup::for_space(&mut model, space).unwrap();
    let shade = ShadingSurface::new(&mut model, &awning).unwrap();
    shade.set_name(&mut model, "Awning").unwrap();
    shade.set_shading_surface_group(&mut model, space_group).unwrap();

    let site_group = ShadingSurfaceGroup::new(&mut model, ShadingSurfaceType::Site).unwrap();
    let tree = ShadingSurface::new(&mut model, &awning).unwrap();
    tree.set_name(&mut model, "Tree").unwrap();
    tree.set_shading_surface_group(&mut model, site_group).unwrap();

    let attic = Space::new(&mut model).unwrap();
    let attic_group = ShadingSurfaceGroup::for_space(&mut model, attic).unwrap();
    let eave = ShadingSurface::new(&mut model, &awning).unwrap();
    eave.set_name(&mut model, "Attic Eave").unwrap();
    eave.set_shading_surface_group(&mut model, attic_group).unwrap();

    let (ws, ft) = forward(&model);
    assert!(ft.errors().is_empty(), "{:?}", ft.errors());
    assert_eq!(field(&ws, "Shading:Building:Detailed", "Awning", 2).as_deref(), Some("4"));
    assert_eq!(field(&ws, "Shading:Building:Detailed", "Awning", 3).as_deref(), Some("10"));
    assert_eq!(field(&ws, "Shading:Site:Detailed", "Tree", 3).as_deref(), Some("0"));
    assert!(ws.object_by_type_and_name("Shading:Building:Detailed", "Attic Eave").is_none());

    let mut rt = ReverseTranslator::new();
    let back = rt.translate_workspace(&ws).unwrap();
    assert!(!rt.warnings().iter().any(|w| w.message.contains("Shading")));
    let awning_back = back.get_by_name::<ShadingSurface>("Awning").unwrap();
    let group = awning_back.shading_surface_group(&back).unwrap();
    assert_eq!(group.shading_surface_type(&back), Some(ShadingSurfaceType::Building));
    assert_eq!(awning_back.vertices(&back)[0], Point3d::new(10.0, 0.0, 3.0));
    let tree_back = back.get_by_name::<ShadingSurface>("Tree").unwrap();
    let group = tree_back.shading_surface_group(&back).unwrap();
    assert_eq!(group.shading_surface_type(&back), Some(ShadingSurfaceType::Site));
}

const HAND_WRITTEN: &str = "
Version, 9.4;
GlobalGeometryRules, UpperLeftCorner, Clockwise, Relative;
Zone, Office, 90, 10, 0, 0, 1, 2;
Material, Concrete, MediumRough, 0.2, 1.7, 2240, 900;
Construction, Slab, Concrete;
BuildingSurface:Detailed, Office Floor, Floor, Slab, Office, Ground, , NoSun, NoWind, , 4,
  5, 0, 0,
  5, 5, 0,
  0, 5, 0,
  0, 0, 0;
People, Office People, Office, Missing Schedule, People/Area, , 0.2, , 0.3, , Missing Schedule;
ZoneHVAC:IdealLoadsAirSystem, Ideal Loads;
Output:SQLite, Simple;
";

#[test]
fn hand_written_input_is_read() {
    let file = IdfFile::parse(HAND_WRITTEN, IddFileType::EnergyPlus).unwrap();
    let mut rt = ReverseTranslator::new();
    let model = rt.translate_idf_file(&file).unwrap();

    assert!(
        rt.warnings()
            .iter()
            .any(|w| w.message.contains("ZoneHVAC:IdealLoadsAirSystem"))
    );
    assert!(!rt.warnings().iter().any(|w| w.message.contains("Output:SQLite")));

    let zone = model.get_by_name::<ThermalZone>("Office").unwrap();
    assert_eq!(zone.multiplier(&model), 2);
    let space = zone.spaces(&model)[0];
    assert_eq!(space.origin(&model).x, 10.0);
    assert_eq!(space.direction_of_relative_north(&model), 90.0);

    // Clockwise input is stored counterclockwise.
    let floor = model.get_by_name::<Surface>("Office Floor").unwrap();
    assert_eq!(floor.vertices(&model)[0], Point3d::new(0.0, 0.0, 0.0));
    assert!(floor.outward_normal(&model).unwrap().z < 0.0);
    assert!((space.floor_area(&model) - 25.0).abs() < 1e-9);

    // 0.2 people/m2 over 25 m2, schedules unresolved.
    let people = model.objects::<People>()[0];
    assert!((people.number_of_people(&model) - 5.0).abs() < 1e-9);
    assert_eq!(people.number_of_people_schedule(&model), None);
}
