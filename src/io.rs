use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{SplitOptions, SplitPolicy};
use crate::dataset::{
    check_val_portion, global_image_sets, per_class_image_sets, val_count, ClassLabelTable,
};
use crate::error::{Error, Result};
use crate::types::ImageSetsSummary;
use crate::utils::{base_id, create_progress_bar, ensure_output_directory, list_annotation_files};
use crate::xml_doc::parse_document;

/// Parse the object names out of a VOC annotation document, in document
/// order and exactly as written.
pub fn read_object_names(xml_content: &str, path: &Path) -> Result<Vec<String>> {
    let root = parse_document(xml_content).map_err(|e| Error::malformed(path, e))?;
    root.descendants_named("object")
        .into_iter()
        .map(|object| {
            object
                .find_text("name")
                .map(str::to_string)
                .ok_or_else(|| Error::malformed(path, "missing element `object/name`"))
        })
        .collect()
}

/// Build the label table from every `*.xml` file in `xml_dir`.
pub fn read_label_table(xml_dir: &Path) -> Result<ClassLabelTable> {
    let files = list_annotation_files(xml_dir)?;
    if files.is_empty() {
        return Err(Error::EmptyInput(xml_dir.to_path_buf()));
    }

    info!(
        "Constructing class labels from {} files in {}",
        files.len(),
        xml_dir.display()
    );
    let pb = create_progress_bar(files.len() as u64, "Read");
    let mut table = ClassLabelTable::new();
    for path in &files {
        let id = base_id(path)
            .ok_or_else(|| Error::malformed(path, "file name has no stem"))?;
        let names = fs::read_to_string(path)
            .map_err(|e| Error::io(path, e))
            .and_then(|xml_content| read_object_names(&xml_content, path));
        let names = match names {
            Ok(names) => names,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };
        table.insert(&id, names);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(table)
}

/// Write `lines`, each newline-terminated, to `path`.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line).map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    debug!("Wrote {} lines to {}", lines.len(), path.display());
    Ok(())
}

struct ImageSetsWriter<'a> {
    dir: &'a Path,
    files: Vec<PathBuf>,
}

impl<'a> ImageSetsWriter<'a> {
    fn new(dir: &'a Path) -> Self {
        Self {
            dir,
            files: Vec::new(),
        }
    }

    fn write(&mut self, file_name: &str, lines: &[String]) -> Result<()> {
        let path = self.dir.join(file_name);
        write_lines(&path, lines)?;
        self.files.push(path);
        Ok(())
    }
}

/// Generate ImageSets lists for the annotations in `xml_dir` into
/// `image_sets_dir`, creating it if needed.
pub fn generate_image_sets(
    xml_dir: &Path,
    image_sets_dir: &Path,
    options: &SplitOptions,
) -> Result<ImageSetsSummary> {
    check_val_portion(options.val_portion)?;
    let table = read_label_table(xml_dir)?;
    ensure_output_directory(image_sets_dir)?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    write_image_sets(&table, image_sets_dir, options.val_portion, options.policy, &mut rng)
}

/// Write the lists for an already-built label table.
pub fn write_image_sets(
    table: &ClassLabelTable,
    image_sets_dir: &Path,
    val_portion: f64,
    policy: SplitPolicy,
    rng: &mut StdRng,
) -> Result<ImageSetsSummary> {
    info!(
        "Writing ImageSets for {} examples and {} classes ({:?})",
        table.len(),
        table.num_classes(),
        policy
    );
    let mut writer = ImageSetsWriter::new(image_sets_dir);
    let mut summary = ImageSetsSummary {
        examples: table.len(),
        classes: table.num_classes(),
        ..Default::default()
    };

    match policy {
        SplitPolicy::GlobalSplit => {
            let sets = global_image_sets(table, val_portion, rng);
            info!("Split: {}", sets.split);
            writer.write("val.txt", &sets.split.val)?;
            writer.write("train.txt", &sets.split.train)?;
            for (class_name, train, val) in &sets.classes {
                writer.write(&format!("{}_val.txt", class_name), val)?;
                writer.write(&format!("{}_train.txt", class_name), train)?;
            }
            summary.train = sets.split.train.len();
            summary.val = sets.split.val.len();
        }
        SplitPolicy::PerClassSplit => {
            let (trainval, classes) = per_class_image_sets(table, val_portion, rng);
            writer.write("trainval.txt", &trainval)?;
            for class in &classes {
                writer.write(&format!("{}_trainval.txt", class.class_name), &class.trainval)?;
                if let Some((split, train, val)) = &class.split {
                    debug!("Split for {}: {}", class.class_name, split);
                    writer.write(&format!("{}_train.txt", class.class_name), train)?;
                    writer.write(&format!("{}_val.txt", class.class_name), val)?;
                }
            }
            // Every class draws the same number of validation examples.
            summary.val = val_count(trainval.len(), val_portion);
            summary.train = trainval.len() - summary.val;
        }
    }

    summary.files = writer.files;
    Ok(summary)
}
