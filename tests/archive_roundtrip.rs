use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::GzDecoder;
use mbzgen::generator::archive::{ArchiveSummary, build_archive};
use mbzgen::model::{LearningContent, LearningElement, LearningSpace, LearningWorld};
use mbzgen::{BackupFileGenerator, ExportOptions, OsFs};
use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;
use walkdir::WalkDir;

/// Relative path -> file content (`None` for directories).
fn tree(root: &Utf8Path) -> BTreeMap<String, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let content = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (rel, content)
        })
        .collect()
}

fn utf8(path: &std::path::Path) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
}

fn world() -> LearningWorld {
    let mut world = LearningWorld::new("Round Trip", "rt");
    let mut space = LearningSpace::new("Basics", "b");
    space.learning_elements.push(LearningElement::new(
        "Intro video",
        "v",
        LearningContent::new("intro", "mp4", vec![0u8; 4096]),
    ));
    space.learning_elements.push(LearningElement::new(
        "Check",
        "c",
        LearningContent::new("check", "h5p", b"PK\x03\x04".to_vec()),
    ));
    world.learning_spaces.push(space);
    world
}

#[test]
fn archive_reproduces_the_staging_tree() -> Result<()> {
    let tmp = tempdir()?;
    let stage = utf8(&tmp.path().join("stage"));
    fs::create_dir_all(stage.join("course"))?;
    fs::create_dir_all(stage.join("activities/resource_1"))?;
    fs::create_dir_all(stage.join("sections/section_1"))?;
    fs::write(stage.join("moodle_backup.xml"), "<moodle_backup/>")?;
    fs::write(stage.join("course/course.xml"), "<course/>")?;
    fs::write(stage.join("activities/resource_1/module.xml"), "<module/>")?;
    fs::write(stage.join("sections/section_1/section.xml"), "<section/>")?;

    let archive = stage.join("stage.mbz");
    let size = build_archive(&mut OsFs, &stage, &archive)?;
    assert_eq!(size, fs::metadata(&archive)?.len());

    let out = utf8(&tmp.path().join("unpacked"));
    fs::create_dir_all(&out)?;
    tar::Archive::new(GzDecoder::new(fs::File::open(&archive)?)).unpack(&out)?;

    let mut expected = tree(&stage);
    expected.remove("stage.mbz");
    assert_eq!(tree(&out), expected);
    Ok(())
}

#[test]
fn export_replaces_existing_destination() -> Result<()> {
    let tmp = tempdir()?;
    let staging_parent = utf8(&tmp.path().join("staging"));
    fs::create_dir_all(&staging_parent)?;
    let output = utf8(&tmp.path().join("out/course.mbz"));
    fs::create_dir_all(output.parent().unwrap())?;
    fs::write(&output, b"previous export")?;

    let options = ExportOptions::default().with_staging_parent(&staging_parent);
    let mut generator = BackupFileGenerator::new(OsFs, options);
    let path = generator.export(&world(), &output)?;
    assert_eq!(path, output);

    let written = fs::read(&output)?;
    assert_ne!(written, b"previous export");
    assert_eq!(&written[..2], &[0x1f_u8, 0x8b]);

    let summary = ArchiveSummary::from_file(&output)?;
    assert_eq!(summary.course_title.as_deref(), Some("Round Trip"));
    assert_eq!(
        summary.activities,
        vec!["activities/resource_1", "activities/h5pactivity_2"]
    );

    // Nothing left behind in the staging parent.
    assert_eq!(fs::read_dir(&staging_parent)?.count(), 0);
    Ok(())
}

#[test]
fn exported_archive_unpacks_into_a_moodle_layout() -> Result<()> {
    let tmp = tempdir()?;
    let output = utf8(&tmp.path().join("rt.mbz"));
    let options = ExportOptions::default().with_staging_parent(utf8(tmp.path()));
    BackupFileGenerator::new(OsFs, options).export(&world(), &output)?;

    let out = utf8(&tmp.path().join("unpacked"));
    fs::create_dir_all(&out)?;
    tar::Archive::new(GzDecoder::new(fs::File::open(&output)?)).unpack(&out)?;

    let tree = tree(&out);
    for path in [
        "moodle_backup.xml",
        "files.xml",
        "roles.xml",
        "gradebook.xml",
        "groups.xml",
        "outcomes.xml",
        "questions.xml",
        "scales.xml",
        "course/course.xml",
        "course/enrolments.xml",
        "course/inforef.xml",
        "course/completiondefaults.xml",
        "sections/section_1/section.xml",
        "sections/section_2/inforef.xml",
        "activities/resource_1/resource.xml",
        "activities/h5pactivity_2/h5pactivity.xml",
    ] {
        assert!(matches!(tree.get(path), Some(Some(_))), "missing {}", path);
    }
    let blobs = tree
        .iter()
        .filter(|(p, c)| p.starts_with("files/") && c.is_some())
        .count();
    assert_eq!(blobs, 2);
    Ok(())
}
