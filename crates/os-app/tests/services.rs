use std::path::PathBuf;

use os_app::{
    AppError, FileFormat, TranslatorConfig, add_analysis, init_project, list_project, load_config,
    load_model, save_config, save_model, summarize_model, translate, update_model, validate_model,
};
use os_idf::StrictnessLevel;
use os_model::example_model;

fn temp(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("os-app-{}-{name}", std::process::id()))
}

#[test]
fn osm_round_trip_keeps_the_building() {
    let path = temp("round.osm");
    let config = TranslatorConfig::default();
    save_model(&example_model().unwrap(), &path, &config).unwrap();

    let loaded = load_model(&path, &config).unwrap();
    assert_eq!(loaded.format, FileFormat::Osm);
    assert!(loaded.updated_from.is_none());

    let summary = summarize_model(&loaded.model);
    assert_eq!(summary.spaces, 1);
    assert_eq!(summary.surfaces, 6);
    assert_eq!(summary.sub_surfaces, 1);
    assert!((summary.floor_area_m2 - 100.0).abs() < 1e-6);
    assert_eq!(summary.object_counts.get("OS:Space"), Some(&1));
    std::fs::remove_file(&path).ok();
}

#[test]
fn osm_translates_to_idf_and_gbxml() {
    let osm = temp("source.osm");
    let idf = temp("target.idf");
    let xml = temp("target.xml");
    let config = TranslatorConfig::default();
    save_model(&example_model().unwrap(), &osm, &config).unwrap();

    let report = translate(&osm, &idf, &config).unwrap();
    assert_eq!(report.input_format, FileFormat::Osm);
    assert_eq!(report.output_format, FileFormat::Idf);
    let text = std::fs::read_to_string(&idf).unwrap();
    assert!(text.contains("BuildingSurface:Detailed"));
    assert!(text.contains("Output:SQLite"));

    translate(&osm, &xml, &config).unwrap();
    assert_eq!(FileFormat::detect(&xml).unwrap(), FileFormat::GbXml);
    let back = load_model(&xml, &config).unwrap();
    assert_eq!(back.format, FileFormat::GbXml);
    assert_eq!(summarize_model(&back.model).spaces, 1);

    for path in [osm, idf, xml] {
        std::fs::remove_file(&path).ok();
    }
}

#[test]
fn forward_options_come_from_config() {
    let osm = temp("options.osm");
    let idf = temp("options.idf");
    let config = TranslatorConfig {
        forward: os_energyplus::ForwardTranslatorOptions {
            exclude_sqlite_output_report: true,
            ..Default::default()
        },
        ..TranslatorConfig::default()
    };
    save_model(&example_model().unwrap(), &osm, &config).unwrap();
    translate(&osm, &idf, &config).unwrap();
    assert!(!std::fs::read_to_string(&idf).unwrap().contains("Output:SQLite"));
    std::fs::remove_file(&osm).ok();
    std::fs::remove_file(&idf).ok();
}

#[test]
fn sdd_is_read_but_not_written() {
    let sdd = temp("bldg.xml");
    std::fs::write(
        &sdd,
        "<?xml version=\"1.0\"?>\n<SDDXML><Proj><Name>P</Name><Bldg><Name>B</Name>\
         <Story><Name>S</Name><Spc><Name>Room</Name></Spc></Story></Bldg></Proj></SDDXML>",
    )
    .unwrap();
    let config = TranslatorConfig::default();
    let loaded = load_model(&sdd, &config).unwrap();
    assert_eq!(loaded.format, FileFormat::Sdd);
    assert_eq!(summarize_model(&loaded.model).spaces, 1);

    let err = save_model(&loaded.model, &temp("out.sdd"), &config).unwrap_err();
    assert!(matches!(err, AppError::Unsupported { .. }));
    std::fs::remove_file(&sdd).ok();
}

#[test]
fn unknown_inputs_are_rejected() {
    let config = TranslatorConfig::default();
    assert!(matches!(
        load_model(&temp("notes.txt"), &config),
        Err(AppError::UnknownFormat { .. })
    ));
    let odd = temp("odd.xml");
    std::fs::write(&odd, "<Catalog/>").unwrap();
    assert!(matches!(
        load_model(&odd, &config),
        Err(AppError::UnknownFormat { .. })
    ));
    std::fs::remove_file(&odd).ok();
}

#[test]
fn strictness_is_checked_on_load() {
    let path = temp("strict.osm");
    let config = TranslatorConfig::default();
    save_model(&example_model().unwrap(), &path, &config).unwrap();

    let draft = TranslatorConfig {
        strictness: Some("draft".into()),
        ..TranslatorConfig::default()
    };
    let loaded = load_model(&path, &draft).unwrap();
    assert_eq!(loaded.model.workspace().strictness(), StrictnessLevel::Draft);
    assert!(validate_model(&loaded.model, StrictnessLevel::Draft).is_valid());
    std::fs::remove_file(&path).ok();
}

#[test]
fn old_osm_is_updated_in_place() {
    let path = temp("old.osm");
    std::fs::write(
        &path,
        "OS:Version,\n  {0e5b0c7a-3b55-4c0f-9d45-8f1a3c2b7e01},\n  1.0.0;\n\n\
         OS:Space,\n  {0e5b0c7a-3b55-4c0f-9d45-8f1a3c2b7e02},\n  Office;\n",
    )
    .unwrap();
    let config = TranslatorConfig::default();

    let loaded = load_model(&path, &config).unwrap();
    assert_eq!(loaded.updated_from.map(|v| v.to_string()).as_deref(), Some("1.0.0"));

    let report = update_model(&path, None, &config).unwrap();
    assert_eq!(report.original_version.as_deref(), Some("1.0.0"));
    assert_eq!(report.version, "1.2.0");
    assert_eq!(report.applied_updates, ["1.0.1", "1.1.0", "1.1.1", "1.2.0"]);

    let again = update_model(&path, None, &config).unwrap();
    assert!(again.applied_updates.is_empty());

    assert!(matches!(
        update_model(&temp("model.idf"), None, &config),
        Err(AppError::Unsupported { .. })
    ));
    std::fs::remove_file(&path).ok();
}

#[test]
fn config_files_round_trip() {
    let path = temp("translator.yaml");
    let config = TranslatorConfig {
        strictness: Some("final".into()),
        gbxml_length_unit: Some("feet".into()),
        allow_newer_versions: false,
        ..TranslatorConfig::default()
    };
    save_config(&path, &config).unwrap();
    assert_eq!(load_config(&path).unwrap(), config);

    std::fs::write(&path, "strictness: loose\n").unwrap();
    assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    assert!(matches!(
        load_config(&temp("absent.yaml")),
        Err(AppError::ConfigRead { .. })
    ));
    std::fs::remove_file(&path).ok();
}

#[test]
fn projects_list_their_analyses() {
    let db = temp("project.osp");
    let seed = temp("seed.osm");
    std::fs::remove_file(&db).ok();
    save_model(&example_model().unwrap(), &seed, &TranslatorConfig::default()).unwrap();

    let record = init_project(&db).unwrap();
    assert!(!record.version.is_empty());
    let analysis = add_analysis(&db, "Baseline", Some(&seed)).unwrap();
    add_analysis(&db, "Unseeded", None).unwrap();
    assert!(analysis.seed_file_reference.is_some());

    let listing = list_project(&db).unwrap();
    assert_eq!(listing.analyses.len(), 2);
    assert_eq!(listing.analyses[0].name, "Baseline");
    assert!(
        listing.analyses[0]
            .seed
            .as_deref()
            .is_some_and(|s| s.ends_with("seed.osm"))
    );
    assert_eq!(listing.analyses[1].seed, None);
    assert_eq!(listing.analyses[0].data_points, 0);

    std::fs::remove_file(&db).ok();
    std::fs::remove_file(&seed).ok();
}
