//! LabelMe XML to PASCAL VOC XML conversion.
//!
//! Conversion is destructive: each source file is replaced by its VOC
//! rendering. A run first converts every file in memory and only then
//! rewrites them, so a malformed file aborts the run before anything on
//! disk has changed.

use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

use crate::config::SourceFormat;
use crate::error::{Error, Result};
use crate::types::{
    ConversionSummary, LabelMeAnnotation, LabelMeBox, LabelMeImageSize, LabelMeObject,
    VocAnnotation, VocBndBox, VocObject, VocSize, VocSource, IMAGE_DEPTH, UNSPECIFIED_POSE,
};
use crate::utils::{create_progress_bar, list_annotation_files};
use crate::xml_doc::{parse_document, Element};

fn required_text(element: &Element, path: &str, file: &Path) -> Result<String> {
    element
        .find_text(path)
        .map(str::to_string)
        .ok_or_else(|| Error::malformed(file, format!("missing element `{}`", path)))
}

/// Parse a LabelMe XML document. `path` is only used for error reporting.
///
/// Objects are collected from anywhere in the document, in document order.
pub fn parse_labelme(xml_content: &str, path: &Path) -> Result<LabelMeAnnotation> {
    let root = parse_document(xml_content).map_err(|e| Error::malformed(path, e))?;

    let objects = root
        .descendants_named("object")
        .into_iter()
        .map(|object| -> Result<LabelMeObject> {
            Ok(LabelMeObject {
                name: required_text(object, "name", path)?,
                bbox: LabelMeBox {
                    xmin: required_text(object, "segm/box/xmin", path)?,
                    ymin: required_text(object, "segm/box/ymin", path)?,
                    xmax: required_text(object, "segm/box/xmax", path)?,
                    ymax: required_text(object, "segm/box/ymax", path)?,
                },
                scribbles: object.find("segm/scribbles").is_some(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LabelMeAnnotation {
        filename: required_text(&root, "filename", path)?,
        imagesize: LabelMeImageSize {
            nrows: required_text(&root, "imagesize/nrows", path)?,
            ncols: required_text(&root, "imagesize/ncols", path)?,
        },
        objects,
    })
}

/// Map a LabelMe annotation onto the VOC schema.
pub fn labelme_to_voc(annotation: &LabelMeAnnotation, imdb_name: &str) -> VocAnnotation {
    let segmented = annotation
        .objects
        .iter()
        .any(|object| object.scribbles);

    let objects = annotation
        .objects
        .iter()
        .map(|object| {
            let bbox = &object.bbox;
            VocObject {
                name: object.name.clone(),
                pose: UNSPECIFIED_POSE.to_string(),
                truncated: false,
                occluded: false,
                difficult: false,
                bndbox: VocBndBox {
                    xmin: bbox.xmin.clone(),
                    ymin: bbox.ymin.clone(),
                    xmax: bbox.xmax.clone(),
                    ymax: bbox.ymax.clone(),
                },
            }
        })
        .collect();

    VocAnnotation {
        folder: imdb_name.to_string(),
        filename: annotation.filename.clone(),
        source: VocSource {
            database: format!("{} Database", imdb_name),
            annotation: format!("{} annotation", imdb_name),
            image: "collected".to_string(),
        },
        // nrows -> width and ncols -> height is the mapping downstream
        // consumers were built against; keep it.
        size: VocSize {
            width: annotation.imagesize.nrows.clone(),
            height: annotation.imagesize.ncols.clone(),
            depth: IMAGE_DEPTH,
        },
        segmented,
        objects,
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn write_leaf<W: Write>(writer: &mut EventWriter<W>, name: &str, text: &str) -> Result<()> {
    writer.write(XmlEvent::start_element(name))?;
    writer.write(XmlEvent::characters(text))?;
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

/// Render a VOC annotation as an indented XML document.
pub fn render_voc_xml(annotation: &VocAnnotation) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = EmitterConfig::new()
            .perform_indent(true)
            .write_document_declaration(false)
            .create_writer(&mut buffer);

        writer.write(XmlEvent::start_element("annotation"))?;
        write_leaf(&mut writer, "folder", &annotation.folder)?;
        write_leaf(&mut writer, "filename", &annotation.filename)?;

        writer.write(XmlEvent::start_element("source"))?;
        write_leaf(&mut writer, "database", &annotation.source.database)?;
        write_leaf(&mut writer, "annotation", &annotation.source.annotation)?;
        write_leaf(&mut writer, "image", &annotation.source.image)?;
        writer.write(XmlEvent::end_element())?;

        writer.write(XmlEvent::start_element("size"))?;
        write_leaf(&mut writer, "width", &annotation.size.width)?;
        write_leaf(&mut writer, "height", &annotation.size.height)?;
        write_leaf(&mut writer, "depth", &annotation.size.depth.to_string())?;
        writer.write(XmlEvent::end_element())?;

        write_leaf(&mut writer, "segmented", flag(annotation.segmented))?;

        for object in &annotation.objects {
            writer.write(XmlEvent::start_element("object"))?;
            write_leaf(&mut writer, "name", &object.name)?;
            write_leaf(&mut writer, "pose", &object.pose)?;
            write_leaf(&mut writer, "truncated", flag(object.truncated))?;
            write_leaf(&mut writer, "occluded", flag(object.occluded))?;
            write_leaf(&mut writer, "difficult", flag(object.difficult))?;

            writer.write(XmlEvent::start_element("bndbox"))?;
            write_leaf(&mut writer, "xmin", &object.bndbox.xmin)?;
            write_leaf(&mut writer, "ymin", &object.bndbox.ymin)?;
            write_leaf(&mut writer, "xmax", &object.bndbox.xmax)?;
            write_leaf(&mut writer, "ymax", &object.bndbox.ymax)?;
            writer.write(XmlEvent::end_element())?;

            writer.write(XmlEvent::end_element())?;
        }

        writer.write(XmlEvent::end_element())?;
    }

    let mut xml = String::from_utf8_lossy(&buffer).into_owned();
    xml.push('\n');
    Ok(xml)
}

/// Read one annotation file in `format` and return its VOC rendering
/// without touching the file.
pub fn convert_file(path: &Path, imdb_name: &str, format: SourceFormat) -> Result<VocAnnotation> {
    let xml_content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    match format {
        SourceFormat::LabelMe => {
            let annotation = parse_labelme(&xml_content, path)?;
            Ok(labelme_to_voc(&annotation, imdb_name))
        }
    }
}

/// Atomically replace `path` with `content`, keeping the permissions of the
/// file being replaced.
pub fn replace_file(path: &Path, content: &str) -> Result<()> {
    let permissions = fs::metadata(path)
        .map_err(|e| Error::io(path, e))?
        .permissions();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// Convert every `*.xml` file in `xml_dir` to VOC, in place.
pub fn convert_directory(
    xml_dir: &Path,
    imdb_name: &str,
    format: SourceFormat,
) -> Result<ConversionSummary> {
    let files = list_annotation_files(xml_dir)?;
    info!(
        "Converting {} annotation files in {} from {:?}",
        files.len(),
        xml_dir.display(),
        format
    );

    let pb = create_progress_bar(files.len() as u64, "Convert");
    let mut summary = ConversionSummary::default();
    let mut rendered: Vec<(PathBuf, String)> = Vec::with_capacity(files.len());
    for path in files {
        let voc = match convert_file(&path, imdb_name, format) {
            Ok(voc) => voc,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };
        summary.files += 1;
        summary.objects += voc.objects.len();
        if voc.segmented {
            summary.segmented += 1;
        }
        rendered.push((path, render_voc_xml(&voc)?));
        pb.inc(1);
    }
    pb.finish_and_clear();

    for (path, xml) in &rendered {
        debug!("Rewriting {}", path.display());
        replace_file(path, xml)?;
    }

    Ok(summary)
}
