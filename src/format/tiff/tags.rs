//! TIFF/Exif field types, directory kinds and tag vocabulary.
//!
//! Tag ids are only meaningful together with the directory they appear in:
//! GPS tag 0x0001 (`GPSLatitudeRef`) and Interoperability tag 0x0001
//! (`InteroperabilityIndex`) share an id. Use [`tag_name`] to resolve a
//! display name for a `(kind, id)` pair.

use serde::Serialize;

// =============================================================================
// Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// Each field type has a fixed element size, which determines whether a
/// value fits inline in a directory entry and how arrays are sliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character, NUL-terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two unsigned 32-bit integers (numerator, denominator)
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two signed 32-bit integers (numerator, denominator)
    SRational = 10,

    /// IEEE single precision float
    Float = 11,

    /// IEEE double precision float
    Double = 12,

    /// 32-bit offset to a sub-directory (TIFF Technical Note 1)
    Ifd = 13,
}

impl FieldType {
    /// Maximum bytes that can be stored inline in a directory entry.
    pub const INLINE_THRESHOLD: u64 = 4;

    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float | FieldType::Ifd => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            13 => Some(FieldType::Ifd),
            _ => None,
        }
    }

    /// Total byte length of `count` values of this type.
    #[inline]
    pub fn byte_len(self, count: u32) -> u64 {
        self.size_in_bytes() as u64 * count as u64
    }

    /// Check if `count` values of this type fit in the 4-byte value field.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        self.byte_len(count) <= Self::INLINE_THRESHOLD
    }

    /// Upper-case name as used in the TIFF 6.0 specification.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Ifd => "IFD",
        }
    }
}

// =============================================================================
// Directory Kinds
// =============================================================================

/// The directories an Exif payload can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DirectoryKind {
    /// IFD0, the main image directory
    Primary,
    /// Exif private directory (camera settings)
    Exif,
    /// GPS directory
    Gps,
    /// Interoperability directory
    Interop,
    /// Vendor MakerNote, when it is laid out as a plain tag directory
    Makernote,
    /// IFD1, chained after IFD0, describing the embedded thumbnail
    Thumbnail,
}

impl DirectoryKind {
    /// All kinds in tree order.
    pub const ALL: [DirectoryKind; 6] = [
        DirectoryKind::Primary,
        DirectoryKind::Exif,
        DirectoryKind::Gps,
        DirectoryKind::Interop,
        DirectoryKind::Makernote,
        DirectoryKind::Thumbnail,
    ];

    /// Human-readable directory name.
    pub const fn name(self) -> &'static str {
        match self {
            DirectoryKind::Primary => "IFD0",
            DirectoryKind::Exif => "Exif",
            DirectoryKind::Gps => "GPS",
            DirectoryKind::Interop => "Interoperability",
            DirectoryKind::Makernote => "MakerNote",
            DirectoryKind::Thumbnail => "IFD1",
        }
    }
}

// =============================================================================
// Tag Tables
// =============================================================================

macro_rules! tag_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl $name {
            /// Create a tag from its numeric id.
            ///
            /// Returns `None` for unrecognized ids. Unknown tags are not an
            /// error; they are kept as opaque entries.
            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Get the numeric tag id.
            #[inline]
            pub const fn as_u16(self) -> u16 {
                self as u16
            }

            /// Tag name as written in the Exif specification.
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }
    };
}

tag_table! {
    /// Tags found in IFD0, IFD1 and the Exif private directory.
    pub enum ExifTag {
        // ---------------------------------------------------------------------
        // Image structure (IFD0 / IFD1)
        // ---------------------------------------------------------------------
        ImageWidth = 0x0100 => "ImageWidth",
        ImageLength = 0x0101 => "ImageLength",
        BitsPerSample = 0x0102 => "BitsPerSample",
        Compression = 0x0103 => "Compression",
        PhotometricInterpretation = 0x0106 => "PhotometricInterpretation",
        ImageDescription = 0x010E => "ImageDescription",
        Make = 0x010F => "Make",
        Model = 0x0110 => "Model",
        StripOffsets = 0x0111 => "StripOffsets",
        Orientation = 0x0112 => "Orientation",
        SamplesPerPixel = 0x0115 => "SamplesPerPixel",
        RowsPerStrip = 0x0116 => "RowsPerStrip",
        StripByteCounts = 0x0117 => "StripByteCounts",
        XResolution = 0x011A => "XResolution",
        YResolution = 0x011B => "YResolution",
        PlanarConfiguration = 0x011C => "PlanarConfiguration",
        ResolutionUnit = 0x0128 => "ResolutionUnit",
        Software = 0x0131 => "Software",
        DateTime = 0x0132 => "DateTime",
        Artist = 0x013B => "Artist",
        /// Offset of the embedded JPEG thumbnail (IFD1)
        JpegInterchangeFormat = 0x0201 => "JPEGInterchangeFormat",
        /// Length of the embedded JPEG thumbnail (IFD1)
        JpegInterchangeFormatLength = 0x0202 => "JPEGInterchangeFormatLength",
        YCbCrPositioning = 0x0213 => "YCbCrPositioning",
        Copyright = 0x8298 => "Copyright",

        // ---------------------------------------------------------------------
        // Sub-directory pointers
        // ---------------------------------------------------------------------
        ExifIfdPointer = 0x8769 => "ExifIFDPointer",
        GpsIfdPointer = 0x8825 => "GPSInfoIFDPointer",
        InteropIfdPointer = 0xA005 => "InteroperabilityIFDPointer",

        // ---------------------------------------------------------------------
        // Exif private directory
        // ---------------------------------------------------------------------
        ExposureTime = 0x829A => "ExposureTime",
        FNumber = 0x829D => "FNumber",
        ExposureProgram = 0x8822 => "ExposureProgram",
        PhotographicSensitivity = 0x8827 => "ISOSpeedRatings",
        ExifVersion = 0x9000 => "ExifVersion",
        DateTimeOriginal = 0x9003 => "DateTimeOriginal",
        DateTimeDigitized = 0x9004 => "DateTimeDigitized",
        OffsetTime = 0x9010 => "OffsetTime",
        ComponentsConfiguration = 0x9101 => "ComponentsConfiguration",
        ShutterSpeedValue = 0x9201 => "ShutterSpeedValue",
        ApertureValue = 0x9202 => "ApertureValue",
        BrightnessValue = 0x9203 => "BrightnessValue",
        ExposureBiasValue = 0x9204 => "ExposureBiasValue",
        MaxApertureValue = 0x9205 => "MaxApertureValue",
        SubjectDistance = 0x9206 => "SubjectDistance",
        MeteringMode = 0x9207 => "MeteringMode",
        LightSource = 0x9208 => "LightSource",
        Flash = 0x9209 => "Flash",
        FocalLength = 0x920A => "FocalLength",
        MakerNote = 0x927C => "MakerNote",
        UserComment = 0x9286 => "UserComment",
        SubSecTime = 0x9290 => "SubSecTime",
        SubSecTimeOriginal = 0x9291 => "SubSecTimeOriginal",
        SubSecTimeDigitized = 0x9292 => "SubSecTimeDigitized",
        FlashpixVersion = 0xA000 => "FlashpixVersion",
        ColorSpace = 0xA001 => "ColorSpace",
        PixelXDimension = 0xA002 => "PixelXDimension",
        PixelYDimension = 0xA003 => "PixelYDimension",
        SensingMethod = 0xA217 => "SensingMethod",
        FileSource = 0xA300 => "FileSource",
        SceneType = 0xA301 => "SceneType",
        CustomRendered = 0xA401 => "CustomRendered",
        ExposureMode = 0xA402 => "ExposureMode",
        WhiteBalance = 0xA403 => "WhiteBalance",
        DigitalZoomRatio = 0xA404 => "DigitalZoomRatio",
        FocalLengthIn35mmFilm = 0xA405 => "FocalLengthIn35mmFilm",
        SceneCaptureType = 0xA406 => "SceneCaptureType",
        Contrast = 0xA408 => "Contrast",
        Saturation = 0xA409 => "Saturation",
        Sharpness = 0xA40A => "Sharpness",
        ImageUniqueId = 0xA420 => "ImageUniqueID",
        BodySerialNumber = 0xA431 => "BodySerialNumber",
        LensSpecification = 0xA432 => "LensSpecification",
        LensMake = 0xA433 => "LensMake",
        LensModel = 0xA434 => "LensModel",
    }
}

tag_table! {
    /// Tags found in the GPS directory.
    pub enum GpsTag {
        VersionId = 0x0000 => "GPSVersionID",
        LatitudeRef = 0x0001 => "GPSLatitudeRef",
        Latitude = 0x0002 => "GPSLatitude",
        LongitudeRef = 0x0003 => "GPSLongitudeRef",
        Longitude = 0x0004 => "GPSLongitude",
        AltitudeRef = 0x0005 => "GPSAltitudeRef",
        Altitude = 0x0006 => "GPSAltitude",
        TimeStamp = 0x0007 => "GPSTimeStamp",
        Satellites = 0x0008 => "GPSSatellites",
        Status = 0x0009 => "GPSStatus",
        MeasureMode = 0x000A => "GPSMeasureMode",
        Dop = 0x000B => "GPSDOP",
        SpeedRef = 0x000C => "GPSSpeedRef",
        Speed = 0x000D => "GPSSpeed",
        TrackRef = 0x000E => "GPSTrackRef",
        Track = 0x000F => "GPSTrack",
        ImgDirectionRef = 0x0010 => "GPSImgDirectionRef",
        ImgDirection = 0x0011 => "GPSImgDirection",
        MapDatum = 0x0012 => "GPSMapDatum",
        DestLatitudeRef = 0x0013 => "GPSDestLatitudeRef",
        DestLatitude = 0x0014 => "GPSDestLatitude",
        DestLongitudeRef = 0x0015 => "GPSDestLongitudeRef",
        DestLongitude = 0x0016 => "GPSDestLongitude",
        DestBearingRef = 0x0017 => "GPSDestBearingRef",
        DestBearing = 0x0018 => "GPSDestBearing",
        DestDistanceRef = 0x0019 => "GPSDestDistanceRef",
        DestDistance = 0x001A => "GPSDestDistance",
        ProcessingMethod = 0x001B => "GPSProcessingMethod",
        AreaInformation = 0x001C => "GPSAreaInformation",
        DateStamp = 0x001D => "GPSDateStamp",
        Differential = 0x001E => "GPSDifferential",
        HPositioningError = 0x001F => "GPSHPositioningError",
    }
}

tag_table! {
    /// Tags found in the Interoperability directory.
    pub enum InteropTag {
        InteroperabilityIndex = 0x0001 => "InteroperabilityIndex",
        InteroperabilityVersion = 0x0002 => "InteroperabilityVersion",
        RelatedImageWidth = 0x1001 => "RelatedImageWidth",
        RelatedImageLength = 0x1002 => "RelatedImageLength",
    }
}

/// Resolve the display name of tag `id` within a directory of `kind`.
///
/// MakerNote tags are vendor-specific and never resolve.
pub fn tag_name(kind: DirectoryKind, id: u16) -> Option<&'static str> {
    match kind {
        DirectoryKind::Gps => GpsTag::from_u16(id).map(GpsTag::name),
        DirectoryKind::Interop => InteropTag::from_u16(id).map(InteropTag::name),
        DirectoryKind::Makernote => None,
        DirectoryKind::Primary | DirectoryKind::Exif | DirectoryKind::Thumbnail => {
            ExifTag::from_u16(id).map(ExifTag::name)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
