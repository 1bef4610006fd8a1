#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    use labelme2voc::config::validate_val_portion;
    use labelme2voc::conversion::{labelme_to_voc, parse_labelme, render_voc_xml};
    use labelme2voc::dataset::{
        check_val_portion, global_image_sets, per_class_image_sets, split_ids, val_count,
    };
    use labelme2voc::io::read_object_names;
    use labelme2voc::utils::base_id;
    use labelme2voc::xml_doc::parse_document;
    use labelme2voc::{
        ClassLabelTable, DatasetLayout, ErrorKind, LineStyle, PosNeg, SourceFormat, SplitPolicy,
    };

    const LABELME_XML: &str = r#"<annotation>
  <filename>img_001.jpg</filename>
  <folder>raw</folder>
  <source>
    <sourceImage>The MIT-CSAIL database of objects and scenes</sourceImage>
    <sourceAnnotation>LabelMe Webtool</sourceAnnotation>
  </source>
  <object>
    <name>dent</name>
    <deleted>0</deleted>
    <verified>0</verified>
    <segm>
      <box>
        <xmin>10</xmin>
        <ymin>20</ymin>
        <xmax>100</xmax>
        <ymax>200</ymax>
      </box>
    </segm>
  </object>
  <imagesize>
    <nrows>480</nrows>
    <ncols>640</ncols>
  </imagesize>
</annotation>
"#;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_validate_val_portion() {
        assert!(validate_val_portion("0.25").is_ok());
        assert!(validate_val_portion("0").is_ok());
        assert!(validate_val_portion("0.99").is_ok());
        assert!(validate_val_portion("1.0").is_err());
        assert!(validate_val_portion("-0.1").is_err());
        assert!(validate_val_portion("abc").is_err());
    }

    #[test]
    fn test_check_val_portion() {
        assert!(check_val_portion(0.0).is_ok());
        let err = check_val_portion(1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_source_format() {
        assert_eq!("labelme".parse::<SourceFormat>().unwrap(), SourceFormat::LabelMe);
        let err = "coco".parse::<SourceFormat>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("coco"));
    }

    #[test]
    fn test_base_id_strips_last_extension() {
        assert_eq!(base_id(Path::new("dir/a.xml")), Some("a".to_string()));
        assert_eq!(
            base_id(Path::new("dir/2016.06.01_a.xml")),
            Some("2016.06.01_a".to_string())
        );
    }

    #[test]
    fn test_dataset_layout() {
        let layout = DatasetLayout::new("/data", "scratches");
        assert_eq!(
            layout.annotations_dir(),
            PathBuf::from("/data/scratches/Annotations")
        );
        assert_eq!(
            layout.image_sets_dir(SplitPolicy::GlobalSplit),
            PathBuf::from("/data/scratches/ImageSets/Main")
        );
        assert_eq!(
            layout.image_sets_dir(SplitPolicy::PerClassSplit),
            PathBuf::from("/data/scratches/ImageSets")
        );
    }

    #[test]
    fn test_labelme_to_voc_field_mapping() {
        let labelme = parse_labelme(LABELME_XML, Path::new("img_001.xml")).unwrap();
        let voc = labelme_to_voc(&labelme, "scratches");

        assert_eq!(voc.folder, "scratches");
        assert_eq!(voc.filename, "img_001.jpg");
        assert_eq!(voc.size.width, "480");
        assert_eq!(voc.size.height, "640");
        assert_eq!(voc.size.depth, 3);
        assert!(!voc.segmented);
        assert_eq!(voc.objects.len(), 1);

        let object = &voc.objects[0];
        assert_eq!(object.name, "dent");
        assert_eq!(object.pose, "Unspecified");
        assert!(!object.truncated && !object.occluded && !object.difficult);
        assert_eq!(object.bndbox.xmin, "10");
        assert_eq!(object.bndbox.ymin, "20");
        assert_eq!(object.bndbox.xmax, "100");
        assert_eq!(object.bndbox.ymax, "200");
    }

    #[test]
    fn test_scribbles_mark_segmented() {
        let xml = LABELME_XML.replace(
            "<segm>",
            "<segm>\n      <mask>img_001_mask_0.png</mask>\n      <scribbles>\n        <xmin>3</xmin>\n        <scribble_name>img_001_scribble_0.png</scribble_name>\n      </scribbles>",
        );
        let labelme = parse_labelme(&xml, Path::new("img_001.xml")).unwrap();
        assert!(labelme_to_voc(&labelme, "scratches").segmented);
    }

    #[test]
    fn test_missing_imagesize_is_malformed() {
        let xml = "<annotation><filename>a.jpg</filename></annotation>";
        let err = parse_labelme(xml, Path::new("a.xml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("a.xml"));
    }

    #[test]
    fn test_missing_box_is_malformed() {
        let xml = "<annotation><filename>a.jpg</filename>\
                   <object><name>dent</name><segm><mask>m.png</mask></segm></object>\
                   <imagesize><nrows>1</nrows><ncols>1</ncols></imagesize></annotation>";
        let err = parse_labelme(xml, Path::new("a.xml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_render_voc_xml_element_order() {
        let labelme = parse_labelme(LABELME_XML, Path::new("img_001.xml")).unwrap();
        let xml = render_voc_xml(&labelme_to_voc(&labelme, "scratches")).unwrap();

        assert!(!xml.starts_with("<?xml"));
        let order = [
            "<annotation>",
            "<folder>scratches</folder>",
            "<filename>img_001.jpg</filename>",
            "<source>",
            "<database>scratches Database</database>",
            "<annotation>scratches annotation</annotation>",
            "<image>collected</image>",
            "<size>",
            "<width>480</width>",
            "<height>640</height>",
            "<depth>3</depth>",
            "<segmented>0</segmented>",
            "<object>",
            "<name>dent</name>",
            "<pose>Unspecified</pose>",
            "<truncated>0</truncated>",
            "<occluded>0</occluded>",
            "<difficult>0</difficult>",
            "<bndbox>",
            "<xmin>10</xmin>",
            "<ymin>20</ymin>",
            "<xmax>100</xmax>",
            "<ymax>200</ymax>",
        ];
        let mut cursor = 0;
        for tag in order {
            let pos = xml[cursor..]
                .find(tag)
                .unwrap_or_else(|| panic!("{} missing or out of order in\n{}", tag, xml));
            cursor += pos + tag.len();
        }
    }

    #[test]
    fn test_line_styles() {
        assert_eq!(LineStyle::Aligned.format_line("a", PosNeg::Positive), "a  1");
        assert_eq!(LineStyle::Aligned.format_line("a", PosNeg::Negative), "a -1");
        assert_eq!(LineStyle::Compact.format_line("a", PosNeg::Positive), "a 1");
        assert_eq!(LineStyle::Compact.format_line("a", PosNeg::Negative), "a -1");
    }

    #[test]
    fn test_label_table_presence() {
        let mut table = ClassLabelTable::new();
        table.insert("b", ["dent", "dent", "scratch"]);
        table.insert("a", ["dent"]);
        table.insert("c", Vec::<String>::new());

        assert_eq!(table.ids(), ids(&["b", "a", "c"]).as_slice());
        assert_eq!(table.class_names().collect::<Vec<_>>(), vec!["dent", "scratch"]);
        assert_eq!(table.label("dent", "b"), PosNeg::Positive);
        assert_eq!(table.label("scratch", "a"), PosNeg::Negative);
        assert_eq!(table.label("dent", "c"), PosNeg::Negative);
        assert_eq!(table.label("unknown", "a"), PosNeg::Negative);
        assert_eq!(
            table.class_lines("dent", &ids(&["a", "b", "c"]), LineStyle::Aligned),
            ids(&["a  1", "b  1", "c -1"])
        );
    }

    #[test]
    fn test_class_names_are_case_sensitive() {
        let mut table = ClassLabelTable::new();
        table.insert("a", ["Dent", "dent", "dent "]);
        assert_eq!(table.num_classes(), 3);
    }

    #[test]
    fn test_val_count_floors() {
        assert_eq!(val_count(3, 0.0), 0);
        assert_eq!(val_count(1, 0.25), 0);
        assert_eq!(val_count(8, 0.25), 2);
        assert_eq!(val_count(10, 0.25), 2);
        assert_eq!(val_count(7, 0.5), 3);
    }

    #[test]
    fn test_split_ids_partitions() {
        let all: Vec<String> = (0..23).map(|i| format!("img_{:03}", i)).collect();
        let mut rng = StdRng::seed_from_u64(2016);
        let split = split_ids(&all, 0.25, &mut rng);

        assert_eq!(split.val.len(), 5);
        assert_eq!(split.train.len() + split.val.len(), all.len());

        let train: HashSet<_> = split.train.iter().collect();
        let val: HashSet<_> = split.val.iter().collect();
        assert!(train.is_disjoint(&val));
        let union: HashSet<_> = train.union(&val).cloned().collect();
        assert_eq!(union, all.iter().collect::<HashSet<_>>());

        let mut sorted = split.val.clone();
        sorted.sort();
        assert_eq!(split.val, sorted);
        let mut sorted = split.train.clone();
        sorted.sort();
        assert_eq!(split.train, sorted);
    }

    #[test]
    fn test_split_ids_is_seeded() {
        let all: Vec<String> = (0..50).map(|i| format!("{}", i)).collect();
        let first = split_ids(&all, 0.3, &mut StdRng::seed_from_u64(7));
        let second = split_ids(&all, 0.3, &mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[test]
    fn test_split_ids_zero_portion() {
        let all = ids(&["c", "a", "b"]);
        let split = split_ids(&all, 0.0, &mut StdRng::seed_from_u64(2016));
        assert!(split.val.is_empty());
        assert_eq!(split.train, ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_global_image_sets_are_exhaustive() {
        let mut table = ClassLabelTable::new();
        for i in 0..12 {
            let id = format!("img_{:02}", i);
            if i % 3 == 0 {
                table.insert(&id, ["dent"]);
            } else {
                table.insert(&id, ["scratch"]);
            }
        }

        let sets = global_image_sets(&table, 0.25, &mut StdRng::seed_from_u64(2016));
        assert_eq!(sets.split.val.len(), 3);
        assert_eq!(sets.classes.len(), 2);
        for (_, train, val) in &sets.classes {
            assert_eq!(train.len(), sets.split.train.len());
            assert_eq!(val.len(), sets.split.val.len());
        }
    }

    #[test]
    fn test_per_class_image_sets_without_val() {
        let mut table = ClassLabelTable::new();
        table.insert("a", ["dent"]);
        table.insert("b", Vec::<String>::new());
        table.insert("c", ["dent"]);

        let (trainval, classes) = per_class_image_sets(&table, 0.0, &mut StdRng::seed_from_u64(2016));
        assert_eq!(trainval, ids(&["a", "b", "c"]));
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].trainval, ids(&["a 1", "b -1", "c 1"]));
        assert!(classes[0].split.is_none());
    }

    #[test]
    fn test_per_class_image_sets_with_val() {
        let mut table = ClassLabelTable::new();
        for i in 0..10 {
            let id = format!("{}", i);
            table.insert(&id, if i < 5 { vec!["dent"] } else { vec!["scratch"] });
        }

        let (trainval, classes) = per_class_image_sets(&table, 0.2, &mut StdRng::seed_from_u64(2016));
        assert_eq!(trainval.len(), 10);
        for class in &classes {
            let (split, train, val) = class.split.as_ref().unwrap();
            assert_eq!(split.val.len(), 2);
            assert_eq!(split.train.len(), 8);
            assert_eq!(train.len(), 8);
            assert_eq!(val.len(), 2);
        }
    }

    #[test]
    fn test_read_object_names_keeps_whitespace() {
        let xml = "<annotation><object><name>dent </name></object>\
                   <object><name>dent</name></object></annotation>";
        let names = read_object_names(xml, Path::new("a.xml")).unwrap();
        assert_eq!(names, vec!["dent ".to_string(), "dent".to_string()]);
    }

    #[test]
    fn test_read_object_names_between_other_elements() {
        let xml = "<annotation><object><name>dent</name></object>\
                   <segmented>0</segmented>\
                   <object><name>scratch</name></object></annotation>";
        let names = read_object_names(xml, Path::new("a.xml")).unwrap();
        assert_eq!(names, vec!["dent".to_string(), "scratch".to_string()]);
    }

    #[test]
    fn test_parse_labelme_keeps_text_verbatim() {
        let xml = LABELME_XML
            .replace("<filename>img_001.jpg</filename>", "<filename> img_001.jpg\n</filename>")
            .replace("<name>dent</name>", "<name>dent </name>");
        let labelme = parse_labelme(&xml, Path::new("img_001.xml")).unwrap();
        assert_eq!(labelme.filename, " img_001.jpg\n");
        assert_eq!(labelme.objects[0].name, "dent ");
    }

    #[test]
    fn test_parse_labelme_objects_between_other_elements() {
        let second = "<object><name>scratch</name><segm><box>\
                      <xmin>1</xmin><ymin>2</ymin><xmax>3</xmax><ymax>4</ymax>\
                      </box></segm></object>\n</annotation>";
        let xml = LABELME_XML.replace("</annotation>", second);
        let labelme = parse_labelme(&xml, Path::new("img_001.xml")).unwrap();

        let names: Vec<_> = labelme.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["dent", "scratch"]);
        assert_eq!(labelme.objects[1].bbox.xmax, "3");
        assert_eq!(labelme.imagesize.nrows, "480");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let root = parse_document("<a><b><c>1</c></b><c>2</c><d><c>3</c></d></a>").unwrap();
        let texts: Vec<_> = root
            .descendants_named("c")
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
        assert_eq!(root.find_text("d/c"), Some("3"));
        assert_eq!(root.find_text("d/e"), None);
    }
}
