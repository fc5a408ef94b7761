use camino::Utf8Path;
use flate2::read::GzDecoder;
use mbzgen::generator::archive::ArchiveSummary;
use mbzgen::generator::layout;
use mbzgen::{BackupFileGenerator, ExportError, ExportOptions, MemFs};
use mbzgen::model::{LearningContent, LearningElement, LearningSpace, LearningWorld};
use roxmltree::Document;
use std::collections::BTreeMap;
use std::io::Read;

const TIMESTAMP: i64 = 1_700_000_000;

fn world() -> LearningWorld {
    let mut world = LearningWorld::new("Element_1", "e1");
    let mut space = LearningSpace::new("Space_1", "s1");
    space.learning_elements.push(LearningElement::new(
        "Quiz",
        "q",
        LearningContent::new("Quiz", "h5p", b"PK\x03\x04h5p".to_vec()),
    ));
    world.learning_spaces.push(space);
    world.learning_elements.push(LearningElement::new(
        "Reading",
        "r",
        LearningContent::new("Reading", "pdf", b"%PDF-1.4".to_vec()),
    ));
    world
}

fn generator(fs: MemFs) -> BackupFileGenerator<MemFs> {
    BackupFileGenerator::new(fs, ExportOptions::default().with_staging_parent("/tmp"))
}

fn staging_fs() -> MemFs {
    let mut fs = MemFs::new();
    mbzgen::FileSystem::create_dir_all(&mut fs, Utf8Path::new("/tmp")).unwrap();
    fs
}

/// Unpack an archive into path -> content; directories map to `None`.
fn unpack(bytes: &[u8]) -> BTreeMap<String, Option<Vec<u8>>> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    let mut out = BTreeMap::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let path = entry.path().unwrap().to_string_lossy().trim_end_matches('/').to_string();
        if entry.header().entry_type().is_dir() {
            out.insert(path, None);
        } else {
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            out.insert(path, Some(data));
        }
    }
    out
}

fn export(output: &str) -> (MemFs, BTreeMap<String, Option<Vec<u8>>>) {
    let mut generator = generator(staging_fs());
    let path = generator
        .export_at(&world(), Utf8Path::new(output), TIMESTAMP)
        .unwrap();
    assert_eq!(path, output);
    let fs = generator.into_fs();
    let entries = unpack(fs.file(output).unwrap());
    (fs, entries)
}

fn xml<'a>(entries: &'a BTreeMap<String, Option<Vec<u8>>>, path: &str) -> &'a str {
    let data = entries
        .get(path)
        .and_then(|d| d.as_deref())
        .unwrap_or_else(|| panic!("missing {}", path));
    std::str::from_utf8(data).unwrap()
}

fn child(node: roxmltree::Node<'_, '_>, name: &str) -> String {
    node.children()
        .find(|c| c.has_tag_name(name))
        .and_then(|c| c.text())
        .unwrap_or_default()
        .to_string()
}

#[test]
fn course_is_named_after_the_world() {
    let (_, entries) = export("/out/Element_1.mbz");
    let text = xml(&entries, "course/course.xml");
    let doc = Document::parse(text).unwrap();
    let course = doc.root_element();
    assert_eq!(course.tag_name().name(), "course");
    assert_eq!(course.attribute("id"), Some("1"));
    assert_eq!(child(course, "shortname"), "Element_1");
    assert_eq!(child(course, "fullname"), "Element_1");
}

#[test]
fn one_activity_directory_per_element() {
    let (_, entries) = export("/out/Element_1.mbz");
    let activity_dirs: Vec<_> = entries
        .iter()
        .filter(|(p, d)| d.is_none() && p.starts_with("activities/") && p.matches('/').count() == 1)
        .map(|(p, _)| p.as_str())
        .collect();
    assert_eq!(activity_dirs, vec!["activities/h5pactivity_1", "activities/resource_2"]);

    for dir in activity_dirs {
        for file in ["module.xml", "grades.xml", "roles.xml", "inforef.xml", "grade_history.xml"] {
            assert!(entries.contains_key(&format!("{}/{}", dir, file)), "{}/{}", dir, file);
        }
    }
    assert!(entries.contains_key("activities/h5pactivity_1/h5pactivity.xml"));
    assert!(entries.contains_key("activities/resource_2/resource.xml"));
}

#[test]
fn sections_hold_their_modules() {
    let (_, entries) = export("/out/Element_1.mbz");

    let general = Document::parse(xml(&entries, "sections/section_1/section.xml")).unwrap();
    assert_eq!(child(general.root_element(), "number"), "0");
    assert_eq!(child(general.root_element(), "sequence"), "2");

    let space = Document::parse(xml(&entries, "sections/section_2/section.xml")).unwrap();
    assert_eq!(space.root_element().attribute("id"), Some("2"));
    assert_eq!(child(space.root_element(), "name"), "Space_1");
    assert_eq!(child(space.root_element(), "sequence"), "1");

    let module = Document::parse(xml(&entries, "activities/h5pactivity_1/module.xml")).unwrap();
    assert_eq!(child(module.root_element(), "sectionid"), "2");
    assert_eq!(child(module.root_element(), "sectionnumber"), "1");
}

#[test]
fn grade_item_ids_agree_across_documents() {
    let (_, entries) = export("/out/Element_1.mbz");
    let expected = layout::grade_item_id(1).to_string();

    let gradebook = Document::parse(xml(&entries, "gradebook.xml")).unwrap();
    let item = gradebook
        .descendants()
        .filter(|n| n.has_tag_name("grade_item"))
        .find(|n| child(*n, "itemmodule") == "h5pactivity")
        .unwrap();
    assert_eq!(item.attribute("id"), Some(expected.as_str()));
    assert_eq!(child(item, "iteminstance"), "1");

    let grades = Document::parse(xml(&entries, "activities/h5pactivity_1/grades.xml")).unwrap();
    let ids: Vec<_> = grades
        .descendants()
        .filter(|n| n.has_tag_name("grade_item"))
        .filter_map(|n| n.attribute("id"))
        .collect();
    assert_eq!(ids, vec![expected.as_str()]);

    let inforef = Document::parse(xml(&entries, "activities/h5pactivity_1/inforef.xml")).unwrap();
    let grade_ref = inforef
        .descendants()
        .find(|n| n.has_tag_name("grade_itemref"))
        .unwrap();
    assert_eq!(child(grade_ref.first_element_child().unwrap(), "id"), expected);

    let resource_grades = Document::parse(xml(&entries, "activities/resource_2/grades.xml")).unwrap();
    assert!(!resource_grades.descendants().any(|n| n.has_tag_name("grade_item")));
}

#[test]
fn payloads_are_referenced_by_files_xml() {
    let (_, entries) = export("/out/Element_1.mbz");
    let files = Document::parse(xml(&entries, "files.xml")).unwrap();
    let rows: Vec<_> = files
        .descendants()
        .filter(|n| n.has_tag_name("file") && child(*n, "filename") != ".")
        .collect();
    assert_eq!(rows.len(), 2);

    for row in rows {
        let hash = child(row, "contenthash");
        let blob = format!("files/{}/{}", &hash[..2], hash);
        let data = entries.get(&blob).and_then(|d| d.as_ref()).unwrap();
        assert_eq!(child(row, "filesize"), data.len().to_string());
    }
}

#[test]
fn moodle_backup_describes_the_archive() {
    let (fs, entries) = export("/out/course.mbz");
    let summary = ArchiveSummary::from_reader(fs.file("/out/course.mbz").unwrap()).unwrap();
    assert_eq!(summary.course_title.as_deref(), Some("Element_1"));
    assert_eq!(
        summary.activities,
        vec!["activities/h5pactivity_1", "activities/resource_2"]
    );
    assert_eq!(summary.sections, vec!["sections/section_1", "sections/section_2"]);

    let backup = Document::parse(xml(&entries, "moodle_backup.xml")).unwrap();
    let info = backup.descendants().find(|n| n.has_tag_name("information")).unwrap();
    assert_eq!(child(info, "name"), "course.mbz");
    assert_eq!(child(info, "backup_date"), TIMESTAMP.to_string());
}

#[test]
fn same_input_produces_same_documents() {
    let (_, first) = export("/a/world.mbz");
    let (_, second) = export("/b/world.mbz");
    assert_eq!(first, second);
}

#[test]
fn staging_tree_is_removed_after_export() {
    let (fs, _) = export("/out/Element_1.mbz");
    let leftovers: Vec<_> = fs.dirs().into_iter().filter(|d| d.as_str().starts_with("/tmp/")).collect();
    assert!(leftovers.is_empty(), "{:?}", leftovers);
    assert_eq!(fs.files(), vec![Utf8Path::new("/out/Element_1.mbz")]);
}

#[test]
fn dsl_document_is_written_on_request() {
    let options = ExportOptions {
        write_dsl_document: true,
        ..ExportOptions::default().with_staging_parent("/tmp")
    };
    let mut generator = BackupFileGenerator::new(staging_fs(), options);
    generator
        .export_at(&world(), Utf8Path::new("/out/w.mbz"), TIMESTAMP)
        .unwrap();
    let json = generator.fs().file("/out/DSL_Document.json").unwrap();
    let doc: serde_json::Value = serde_json::from_slice(json).unwrap();
    assert_eq!(doc["identifier"]["value"], "Element_1");
    assert_eq!(doc["learningElements"].as_array().unwrap().len(), 2);
}

#[test]
fn invalid_world_writes_nothing() {
    let mut world = world();
    world.name.clear();
    let mut generator = generator(staging_fs());
    let err = generator
        .export_at(&world, Utf8Path::new("/out/x.mbz"), TIMESTAMP)
        .unwrap_err();
    assert!(matches!(err, ExportError::InvalidWorld(_)));

    let fs = generator.into_fs();
    assert!(fs.files().is_empty());
    assert_eq!(fs.dirs(), vec![Utf8Path::new("/"), Utf8Path::new("/tmp")]);
}

#[test]
fn unwritable_staging_area_fails_before_archiving() {
    let mut generator = generator(MemFs::read_only());
    let err = generator
        .export_at(&world(), Utf8Path::new("/out/x.mbz"), TIMESTAMP)
        .unwrap_err();
    assert!(matches!(err, ExportError::Staging(_)));
    assert!(generator.fs().files().is_empty());
}

#[test]
fn failed_finalize_leaves_no_staging_tree() {
    let mut fs = staging_fs();
    // A directory where the archive should go cannot be replaced.
    mbzgen::FileSystem::create_dir_all(&mut fs, Utf8Path::new("/out/x.mbz")).unwrap();
    let mut generator = generator(fs);
    let err = generator
        .export_at(&world(), Utf8Path::new("/out/x.mbz"), TIMESTAMP)
        .unwrap_err();
    assert!(matches!(err, ExportError::Finalize { .. }));

    let fs = generator.into_fs();
    assert!(fs.files().is_empty());
    assert!(!fs.dirs().iter().any(|d| d.as_str().starts_with("/tmp/")));
}

fn staging_leftovers(fs: &MemFs) -> Vec<String> {
    fs.files()
        .into_iter()
        .chain(fs.dirs())
        .filter(|p| p.as_str().starts_with("/tmp/"))
        .map(|p| p.to_string())
        .collect()
}

#[test]
fn output_named_like_a_backup_document_keeps_that_document() {
    let (_, entries) = export("/out/roles.xml");
    let roles = Document::parse(xml(&entries, "roles.xml")).unwrap();
    assert_eq!(roles.root_element().tag_name().name(), "roles_definition");

    let backup = Document::parse(xml(&entries, "moodle_backup.xml")).unwrap();
    let info = backup.descendants().find(|n| n.has_tag_name("information")).unwrap();
    assert_eq!(child(info, "name"), "roles.xml");
}

#[test]
fn output_named_like_a_staging_directory_exports() {
    for output in ["/out/course", "/out/activities", "/out/files", "/out/sections"] {
        let (_, entries) = export(output);
        assert!(entries.contains_key("course/course.xml"), "{}", output);
        assert!(entries.contains_key("activities/resource_2/module.xml"), "{}", output);
        assert!(!entries.keys().any(|p| p.ends_with(".mbz")), "{}", output);
    }
}

#[test]
fn failed_dsl_delivery_takes_the_archive_back() {
    let mut fs = staging_fs();
    mbzgen::FileSystem::create_dir_all(&mut fs, Utf8Path::new("/out/DSL_Document.json")).unwrap();
    let options = ExportOptions {
        write_dsl_document: true,
        ..ExportOptions::default().with_staging_parent("/tmp")
    };
    let mut generator = BackupFileGenerator::new(fs, options);
    let err = generator
        .export_at(&world(), Utf8Path::new("/out/w.mbz"), TIMESTAMP)
        .unwrap_err();
    match err {
        ExportError::Finalize { path, .. } => assert_eq!(path, "/out/DSL_Document.json"),
        other => panic!("unexpected error: {:?}", other),
    }

    let fs = generator.into_fs();
    assert!(fs.file("/out/w.mbz").is_none());
    assert!(fs.files().is_empty());
    assert!(staging_leftovers(&fs).is_empty());
}

#[test]
fn failure_while_populating_removes_the_partial_tree() {
    let mut fs = staging_fs();
    fs.fail_writes_ending_with("module.xml");
    let mut generator = generator(fs);
    let err = generator
        .export_at(&world(), Utf8Path::new("/out/x.mbz"), TIMESTAMP)
        .unwrap_err();
    assert!(matches!(err, ExportError::Staging(_)), "{:?}", err);

    let fs = generator.into_fs();
    assert!(fs.files().is_empty());
    assert!(staging_leftovers(&fs).is_empty());
}

#[test]
fn failure_while_archiving_removes_the_staging_tree() {
    let mut fs = staging_fs();
    fs.fail_writes_ending_with(".mbz");
    let mut generator = generator(fs);
    let err = generator
        .export_at(&world(), Utf8Path::new("/out/x.mbz"), TIMESTAMP)
        .unwrap_err();
    assert!(matches!(err, ExportError::Archive(_)), "{:?}", err);

    let fs = generator.into_fs();
    assert!(fs.files().is_empty());
    assert!(staging_leftovers(&fs).is_empty());
}

#[test]
fn staging_tree_that_cannot_be_removed_does_not_fail_a_delivered_export() {
    let mut fs = staging_fs();
    fs.fail_removals_under("/tmp/");
    let mut generator = generator(fs);
    let path = generator
        .export_at(&world(), Utf8Path::new("/out/x.mbz"), TIMESTAMP)
        .unwrap();
    assert_eq!(path, "/out/x.mbz");

    let fs = generator.into_fs();
    let summary = ArchiveSummary::from_reader(fs.file("/out/x.mbz").unwrap()).unwrap();
    assert_eq!(summary.course_title.as_deref(), Some("Element_1"));
    assert!(!staging_leftovers(&fs).is_empty());
}
