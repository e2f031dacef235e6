use os_idd::{FieldType, IddFileType};

#[test]
fn openstudio_schema_parses() {
    let idd = IddFileType::OpenStudio.idd();
    assert_eq!(idd.version(), "1.2.0");
    assert!(idd.version_object().unwrap().is_required());

    for obj in idd.objects() {
        assert_eq!(
            obj.handle_field_index(),
            Some(0),
            "{} must start with a handle",
            obj.name()
        );
    }

    let surface = idd.get_object("OS:Surface").unwrap();
    assert!(surface.has_vertex_format());
    assert_eq!(surface.num_fixed_fields(), 10);
    assert_eq!(surface.extensible_group_size(), Some(3));
    assert_eq!(surface.field(13).unwrap().name, "Vertex X-coordinate");
    assert_eq!(surface.references(), ["SurfaceNames"]);

    let space = idd.get_object("OS:Space").unwrap();
    let zone_field = space.field(3).unwrap();
    assert_eq!(zone_field.field_type, FieldType::ObjectList);
    assert_eq!(zone_field.object_lists, ["ThermalZoneNames"]);
    assert!(idd.get_object("OS:ThermalZone").unwrap().is_referenced_by(&zone_field.object_lists));
}

#[test]
fn energyplus_schema_parses() {
    let idd = IddFileType::EnergyPlus.idd();
    assert_eq!(idd.version(), "9.4.0");
    assert_eq!(idd.version_object().unwrap().name(), "Version");

    let required: Vec<&str> = idd.required_objects().map(|o| o.name()).collect();
    assert_eq!(required, ["Building", "GlobalGeometryRules"]);

    let surface = idd.get_object("buildingsurface:detailed").unwrap();
    assert_eq!(surface.num_fixed_fields(), 10);
    assert_eq!(surface.name_field_index(), Some(0));
    assert!(surface.references().iter().any(|r| r == "OutFaceEnvNames"));

    let year = idd.get_object("Schedule:Year").unwrap();
    let ext = year.extensible_index(9).unwrap();
    assert_eq!((ext.group, ext.field), (1, 2));
    assert_eq!(year.field(9).unwrap().name, "Start Day");

    let limits = idd.get_object("ScheduleTypeLimits").unwrap();
    assert!(limits.field(1).unwrap().accepts_auto("AutoSize"));
}

#[test]
fn schemas_are_shared() {
    let a = IddFileType::OpenStudio.idd();
    let b = IddFileType::OpenStudio.idd();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(IddFileType::EnergyPlus.version_type(), "Version");
}
