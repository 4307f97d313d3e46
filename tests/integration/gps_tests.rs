//! GPS extraction tests over encoded payloads.

use exif_inspector::{parse, DirectoryKind, ExifError, GpsTag, Rational, TagValue};

use super::test_utils::{camera_payload, wrap_in_jpeg, Endian, ExifBuilder, Field};

const LAT: [(u32, u32); 3] = [(37, 1), (48, 1), (3000, 100)];
const LON: [(u32, u32); 3] = [(122, 1), (25, 1), (0, 1)];

const EXPECTED_LAT: f64 = 37.0 + 48.0 / 60.0 + 30.0 / 3600.0;
const EXPECTED_LON: f64 = 122.0 + 25.0 / 60.0;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_north_west_position() {
    for order in [Endian::Little, Endian::Big] {
        let model = parse(camera_payload(order)).unwrap();
        let position = model.gps_coordinate().unwrap().unwrap();

        assert!(approx(position.latitude, EXPECTED_LAT), "{:?}", order);
        assert!(approx(position.longitude, -EXPECTED_LON), "{:?}", order);
        assert_eq!(position.altitude, None);
    }
}

#[test]
fn test_south_east_position() {
    let tiff = ExifBuilder::big_endian()
        .gps_position("S", LAT, "E", LON)
        .build();

    let position = parse(wrap_in_jpeg(&tiff)).unwrap().gps_coordinate().unwrap().unwrap();
    assert!(approx(position.latitude, -EXPECTED_LAT));
    assert!(approx(position.longitude, EXPECTED_LON));
}

#[test]
fn test_hemisphere_only_changes_sign() {
    let north = ExifBuilder::little_endian().gps_position("N", LAT, "E", LON).build();
    let south = ExifBuilder::little_endian().gps_position("S", LAT, "W", LON).build();

    let north = parse(north).unwrap().gps_coordinate().unwrap().unwrap();
    let south = parse(south).unwrap().gps_coordinate().unwrap().unwrap();
    assert_eq!(south.latitude, -north.latitude);
    assert_eq!(south.longitude, -north.longitude);
}

#[test]
fn test_raw_gps_tags_are_exposed() {
    let model = parse(camera_payload(Endian::Little)).unwrap();
    assert_eq!(
        model.get_tag(DirectoryKind::Gps, GpsTag::Latitude.as_u16()),
        Some(&TagValue::Rational(vec![
            Rational::new(37, 1),
            Rational::new(48, 1),
            Rational::new(3000, 100),
        ]))
    );
    assert_eq!(
        model.ascii(DirectoryKind::Gps, GpsTag::LatitudeRef.as_u16()),
        Some("N")
    );
}

#[test]
fn test_altitude() {
    let above = ExifBuilder::little_endian()
        .gps_position("N", LAT, "W", LON)
        .gps(0x0005, Field::Byte(vec![0]))
        .gps(0x0006, Field::Rational(vec![(15250, 100)]))
        .build();
    let below = ExifBuilder::big_endian()
        .gps_position("N", LAT, "W", LON)
        .gps(0x0005, Field::Byte(vec![1]))
        .gps(0x0006, Field::Rational(vec![(15250, 100)]))
        .build();

    let above = parse(above).unwrap().gps_coordinate().unwrap().unwrap();
    let below = parse(below).unwrap().gps_coordinate().unwrap().unwrap();
    assert_eq!(above.altitude, Some(152.5));
    assert_eq!(below.altitude, Some(-152.5));
}

#[test]
fn test_zero_denominator_fails_only_gps() {
    let tiff = ExifBuilder::little_endian()
        .ifd0(0x010F, Field::ascii("Apple"))
        .gps_position("N", [(37, 1), (48, 0), (30, 1)], "W", LON)
        .build();

    let model = parse(tiff).unwrap();
    assert_eq!(model.make(), Some("Apple"));
    assert_eq!(model.gps_coordinate(), Err(ExifError::DivisionByZero));
}

#[test]
fn test_invalid_reference() {
    let tiff = ExifBuilder::big_endian()
        .gps_position("N", LAT, "X", LON)
        .build();

    assert_eq!(
        parse(tiff).unwrap().gps_coordinate(),
        Err(ExifError::InvalidReference("X".to_string()))
    );
}

#[test]
fn test_multi_character_reference() {
    let tiff = ExifBuilder::little_endian()
        .gps_position("North", LAT, "W", LON)
        .build();

    assert_eq!(
        parse(tiff).unwrap().gps_coordinate(),
        Err(ExifError::InvalidReference("North".to_string()))
    );
}

#[test]
fn test_latitude_with_two_components() {
    let tiff = ExifBuilder::little_endian()
        .gps(0x0001, Field::ascii("N"))
        .gps(0x0002, Field::Rational(vec![(37, 1), (48, 1)]))
        .gps(0x0003, Field::ascii("W"))
        .gps(0x0004, Field::Rational(LON.to_vec()))
        .build();

    assert!(matches!(
        parse(tiff).unwrap().gps_coordinate(),
        Err(ExifError::InvalidTagValue {
            tag: "GPSLatitude",
            ..
        })
    ));
}

#[test]
fn test_reference_with_wrong_type() {
    let tiff = ExifBuilder::big_endian()
        .gps(0x0001, Field::Short(vec![78]))
        .gps(0x0002, Field::Rational(LAT.to_vec()))
        .gps(0x0003, Field::ascii("W"))
        .gps(0x0004, Field::Rational(LON.to_vec()))
        .build();

    assert!(matches!(
        parse(tiff).unwrap().gps_coordinate(),
        Err(ExifError::InvalidTagValue {
            tag: "GPSLatitudeRef",
            ..
        })
    ));
}

#[test]
fn test_partial_gps_directory_is_absent() {
    let tiff = ExifBuilder::little_endian()
        .gps(0x0000, Field::Byte(vec![2, 3, 0, 0]))
        .gps(0x0001, Field::ascii("N"))
        .gps(0x0002, Field::Rational(LAT.to_vec()))
        .build();

    let model = parse(tiff).unwrap();
    assert!(model.directory(DirectoryKind::Gps).is_some());
    assert_eq!(model.gps_coordinate(), Ok(None));
}

#[test]
fn test_gps_pointer_to_ifd0_is_cyclic() {
    let tiff = ExifBuilder::big_endian()
        .ifd0(0x8825, Field::Long(vec![8]))
        .build();

    assert_eq!(
        parse(tiff).unwrap_err(),
        ExifError::CyclicDirectory { offset: 8 }
    );
}
