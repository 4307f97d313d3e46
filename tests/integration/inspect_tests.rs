//! Batch inspection tests over files on disk.

use exif_inspector::inspect::{render_text, GpsItem, ReportItem};
use exif_inspector::{
    Container, ExifError, GpsStatus, ImageSource, InspectError, Inspector, IoError,
    LocalFileSource, ThumbnailStatus,
};

use super::test_utils::{camera_payload, temp_file, wrap_in_jpeg, Endian, ExifBuilder, Field};

#[tokio::test]
async fn test_local_source_feeds_decoder() {
    let jpeg = wrap_in_jpeg(&camera_payload(Endian::Big));
    let file = temp_file(&jpeg);

    let source = LocalFileSource::new(file.path());
    let bytes = source.load().await.unwrap();
    assert_eq!(bytes.len(), jpeg.len());

    let model = exif_inspector::parse(bytes).unwrap();
    assert_eq!(model.make(), Some("Canon"));
}

#[tokio::test]
async fn test_inspect_jpeg_report() {
    let jpeg = wrap_in_jpeg(&camera_payload(Endian::Little));
    let file = temp_file(&jpeg);

    let report = Inspector::new(1)
        .with_digest(true)
        .inspect_source(&LocalFileSource::new(file.path()))
        .await
        .unwrap();

    assert_eq!(report.container, Container::Jpeg);
    assert_eq!(report.byte_order, "II");
    assert_eq!(report.size, jpeg.len() as u64);
    assert_eq!(
        report.directories.iter().map(|d| d.name).collect::<Vec<_>>(),
        vec!["IFD0", "Exif", "GPS"]
    );
    assert!(matches!(report.gps, GpsStatus::Present(_)));

    let make = &report.directories[0].entries[0];
    assert_eq!(make.tag, "0x010F");
    assert_eq!(make.name, Some("Make"));
    assert_eq!(make.field_type, "ASCII");
    assert_eq!(make.value, "Canon");

    let sha256 = report.sha256.as_deref().unwrap();
    assert_eq!(sha256.len(), 64);
    assert!(sha256.chars().all(|c| c.is_ascii_hexdigit()));

    let text = render_text(&report);
    assert!(text.contains("[GPS]"));
    assert!(text.contains("GPS: 37.808333, -122.416667"));
}

#[tokio::test]
async fn test_inspect_many_files() {
    let good = temp_file(&camera_payload(Endian::Big));
    let no_exif = temp_file(&[0xFF, 0xD8, 0xFF, 0xD9]);
    let cyclic = temp_file(
        &ExifBuilder::little_endian()
            .ifd0(0x8769, Field::Long(vec![8]))
            .build(),
    );
    let broken_gps = temp_file(
        &ExifBuilder::little_endian()
            .gps_position("N", [(1, 0), (0, 1), (0, 1)], "E", [(1, 1), (0, 1), (0, 1)])
            .build(),
    );

    let outcomes = Inspector::new(3)
        .inspect_paths([good.path(), no_exif.path(), cyclic.path(), broken_gps.path()])
        .await;

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(InspectError::Exif(ExifError::NoExifData))
    ));
    assert!(matches!(
        outcomes[2].result,
        Err(InspectError::Exif(ExifError::CyclicDirectory { offset: 8 }))
    ));

    // A broken GPS directory still yields a report
    let report = outcomes[3].result.as_ref().unwrap();
    assert_eq!(
        report.gps,
        GpsStatus::Invalid {
            error: ExifError::DivisionByZero.to_string()
        }
    );
}

#[tokio::test]
async fn test_json_items() {
    let good = temp_file(&camera_payload(Endian::Little));
    let missing = good.path().with_extension("does-not-exist");

    let outcomes = Inspector::default()
        .inspect_paths([good.path().to_path_buf(), missing])
        .await;
    assert!(matches!(
        outcomes[1].result,
        Err(InspectError::Io(IoError::NotFound(_)))
    ));

    let items: Vec<ReportItem> = outcomes.iter().map(ReportItem::from).collect();
    let json = serde_json::to_value(&items).unwrap();
    assert_eq!(json[0]["container"], "tiff");
    assert_eq!(json[0]["gps"]["status"], "present");
    assert!(json[0].get("sha256").is_none());
    assert!(json[1]["error"].as_str().unwrap().contains("Not found"));

    let gps: Vec<GpsItem> = outcomes.iter().map(GpsItem::from).collect();
    let json = serde_json::to_value(&gps).unwrap();
    assert_eq!(json[0]["status"], "present");
    assert!((json[0]["latitude"].as_f64().unwrap() - 37.808333).abs() < 1e-5);
    assert_eq!(json[1]["status"], "invalid");
}

#[tokio::test]
async fn test_corrupt_thumbnail_is_reported() {
    let tiff = ExifBuilder::little_endian()
        .ifd0(0x0112, Field::Short(vec![1]))
        .ifd1(0x0201, Field::Long(vec![5000]))
        .ifd1(0x0202, Field::Long(vec![100]))
        .build();
    let size = tiff.len();
    let file = temp_file(&tiff);

    let report = Inspector::new(1)
        .inspect_source(&LocalFileSource::new(file.path()))
        .await
        .unwrap();

    let expected = ExifError::OutOfBounds {
        offset: 5000,
        requested: 100,
        size: size as u64,
    };
    assert_eq!(
        report.thumbnail,
        ThumbnailStatus::Invalid {
            error: expected.to_string()
        }
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["thumbnail"]["status"], "invalid");
    assert!(render_text(&report).contains("Thumbnail: invalid ("));
}

#[tokio::test]
async fn test_valid_and_missing_thumbnail() {
    let jpeg = [0xFF, 0xD8, 0xFF, 0xD9];
    let with_thumbnail = temp_file(
        &ExifBuilder::big_endian()
            .ifd1(0x0103, Field::Short(vec![6]))
            .thumbnail(&jpeg)
            .build(),
    );
    let without = temp_file(&camera_payload(Endian::Little));

    let outcomes = Inspector::new(2)
        .inspect_paths([with_thumbnail.path(), without.path()])
        .await;

    let present = outcomes[0].result.as_ref().unwrap();
    assert_eq!(present.thumbnail, ThumbnailStatus::Present { size: 4 });
    let absent = outcomes[1].result.as_ref().unwrap();
    assert_eq!(absent.thumbnail, ThumbnailStatus::Absent);
}

#[tokio::test]
async fn test_gps_items_flag_corrupt_positions() {
    let good = temp_file(&camera_payload(Endian::Big));
    let no_gps = temp_file(
        &ExifBuilder::little_endian()
            .ifd0(0x010F, Field::ascii("Nikon"))
            .build(),
    );
    let broken = temp_file(
        &ExifBuilder::big_endian()
            .gps_position("N", [(37, 1), (48, 0), (30, 1)], "W", [(1, 1), (0, 1), (0, 1)])
            .build(),
    );

    let outcomes = Inspector::new(3)
        .inspect_paths([good.path(), no_gps.path(), broken.path()])
        .await;
    assert!(outcomes.iter().all(|outcome| outcome.is_ok()));

    let flags: Vec<bool> = outcomes
        .iter()
        .map(|outcome| GpsItem::from(outcome).gps.is_invalid())
        .collect();
    assert_eq!(flags, vec![false, false, true]);
}
