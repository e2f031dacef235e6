use os_core::VersionString;
use os_model::{Construction, ModelObject, SimpleGlazing, Space};
use os_osversion::{VersionError, VersionTranslator};

fn v(s: &str) -> VersionString {
    s.parse().unwrap()
}

fn osm(version: &str, body: &str) -> String {
    format!(
        "OS:Version,\n  {{0e5b0c7a-3b55-4c0f-9d45-8f1a3c2b7e01}}, !- Handle\n  {version}; !- Version Identifier\n\n{body}"
    )
}

const OLD_BODY: &str = "\
OS:Schedule:Day,
  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e61}, !- Handle
  Ramp Day,                               !- Name
  ,                                       !- Schedule Type Limits Name
  Yes,                                    !- Interpolate to Timestep
  24,                                     !- Hour 1
  0,                                      !- Minute 1
  1;                                      !- Value Until Time 1

OS:Schedule:Day,
  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e62}, !- Handle
  Flat Day,                               !- Name
  ,                                       !- Schedule Type Limits Name
  No,                                     !- Interpolate to Timestep
  24,                                     !- Hour 1
  0,                                      !- Minute 1
  0.5;                                    !- Value Until Time 1

OS:Space,
  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e63}, !- Handle
  Office,                                 !- Name
  ,                                       !- Building Story Name
  ,                                       !- Thermal Zone Name
  0,                                      !- X Origin
  0,                                      !- Y Origin
  0,                                      !- Z Origin
  0;                                      !- Direction of Relative North

OS:WindowMaterial:SimpleGlazing,
  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e64}, !- Handle
  Glass,                                  !- Name
  2.0,                                    !- U-Factor
  0.4,                                    !- Solar Heat Gain Coefficient
  0.6;                                    !- Visible Transmittance

OS:Construction,
  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e65}, !- Handle
  Window Cons,                            !- Name
  ,                                       !- Surface Rendering Name
  Glass;                                  !- Layer 1

OS:ComponentData:Tags,
  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e66}, !- Handle
  Tags;                                   !- Name

OS:Retired:Gadget,
  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e67}, !- Handle
  Gadget;                                 !- Name
";

#[test]
fn every_update_runs_once_in_order() {
    let mut vt = VersionTranslator::new();
    let model = vt.update_version(&osm("0.9.0", OLD_BODY)).unwrap();

    assert_eq!(vt.original_version(), Some(&v("0.9.0")));
    let applied: Vec<String> = vt.applied_updates().iter().map(|v| v.to_string()).collect();
    assert_eq!(applied, ["0.9.1", "1.0.0", "1.0.1", "1.1.0", "1.1.1", "1.2.0"]);
    assert_eq!(model.version(), v("1.2.0"));

    // Ramp Day, Office and Glass.
    assert_eq!(vt.refactored_objects().len(), 3);
    assert_eq!(vt.deprecated_objects().len(), 1);
    assert_eq!(vt.untranslated_objects().len(), 1);
    assert_eq!(vt.untranslated_objects()[0].type_name(), "OS:Retired:Gadget");
    assert!(vt.new_objects().is_empty());
}

#[test]
fn updated_objects_land_in_the_model() {
    let mut vt = VersionTranslator::new();
    let model = vt.update_version(&osm("0.9.0", OLD_BODY)).unwrap();
    let ws = model.workspace();

    let days = ws.objects_by_type("OS:Schedule:Day");
    let mut interpolation: Vec<String> = days
        .iter()
        .filter_map(|&id| ws.get_string(id, 3))
        .collect();
    interpolation.sort();
    assert_eq!(interpolation, ["Average", "No"]);

    let office = model.get_by_name::<Space>("Office").unwrap();
    assert!(office.part_of_total_floor_area(&model));

    let glass = model.get_by_name::<SimpleGlazing>("Glass").unwrap();
    assert!((glass.u_factor(&model) - 2.0).abs() < 1e-12);
    let cons = model.get_by_name::<Construction>("Window Cons").unwrap();
    let layers = cons.layers(&model);
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].name(&model).as_deref(), Some("Glass"));
}

#[test]
fn later_start_skips_earlier_updates() {
    let body = "OS:Space,\n  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e63},\n  Office;\n";
    let mut vt = VersionTranslator::new();
    let model = vt.update_version(&osm("1.1.0", body)).unwrap();
    let applied: Vec<String> = vt.applied_updates().iter().map(|v| v.to_string()).collect();
    assert_eq!(applied, ["1.1.1", "1.2.0"]);
    assert!(vt.refactored_objects().is_empty());
    assert!(model.get_by_name::<Space>("Office").is_some());
}

#[test]
fn current_files_pass_through() {
    let mut vt = VersionTranslator::new();
    let model = vt.update_version(&osm("1.2.0", "")).unwrap();
    assert!(vt.applied_updates().is_empty());
    assert_eq!(model.version(), v("1.2.0"));
}

#[test]
fn one_release_ahead_is_read_when_allowed() {
    let mut vt = VersionTranslator::new();
    assert!(vt.allow_newer_versions());
    let model = vt.update_version(&osm("1.2.1", "")).unwrap();
    assert_eq!(model.version(), v("1.2.0"));
    assert_eq!(vt.warnings().len(), 1);

    vt.set_allow_newer_versions(false);
    let err = vt.update_version(&osm("1.2.1", "")).unwrap_err();
    assert!(matches!(err, VersionError::TooNew { .. }));
}

#[test]
fn far_future_and_ancient_files_are_refused() {
    let mut vt = VersionTranslator::new();
    assert!(matches!(
        vt.update_version(&osm("1.4.0", "")),
        Err(VersionError::TooNew { .. })
    ));
    assert!(matches!(
        vt.update_version(&osm("0.8.0", "")),
        Err(VersionError::TooOld { .. })
    ));
    assert!(matches!(
        vt.update_version("OS:ThermalZone,\n  {6a1d2f3e-4b5c-4d6e-8f70-1a2b3c4d5e68},\n  Core;\n"),
        Err(VersionError::MissingVersion)
    ));
}

#[test]
fn load_model_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("os-osversion-{}.osm", std::process::id()));
    std::fs::write(&path, osm("1.0.0", "")).unwrap();
    let mut vt = VersionTranslator::new();
    let model = vt.load_model(&path).unwrap();
    assert_eq!(model.version(), v("1.2.0"));
    std::fs::remove_file(&path).ok();
}
