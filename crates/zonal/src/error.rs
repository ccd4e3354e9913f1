use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geo(#[from] geo::Error),
    #[error("Product '{product}' is not available: {reason}")]
    ProductUnavailable { product: String, reason: String },
    #[error("Grids are not aligned: {0}")]
    MisalignedGrids(String),
    #[error("No valid data in the selected area")]
    NoValidData,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Category of a pipeline failure, used to present a short status to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownCrs,
    DegenerateGeometry,
    ProductUnavailable,
    EmptyMask,
    MisalignedGrids,
    NoValidData,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Geo(geo::Error::UnknownCrs(_)) => ErrorKind::UnknownCrs,
            Error::Geo(geo::Error::DegenerateGeometry(_) | geo::Error::GeoJsonError(_)) => ErrorKind::DegenerateGeometry,
            Error::Geo(geo::Error::EmptyMask) => ErrorKind::EmptyMask,
            Error::Geo(geo::Error::SizeMismatch { .. }) | Error::MisalignedGrids(_) => ErrorKind::MisalignedGrids,
            Error::ProductUnavailable { .. } => ErrorKind::ProductUnavailable,
            Error::NoValidData => ErrorKind::NoValidData,
            _ => ErrorKind::Internal,
        }
    }

    /// Short user facing message, the underlying projection or loader details are not exposed
    pub fn status_message(&self) -> String {
        match self.kind() {
            ErrorKind::UnknownCrs => "Unsupported coordinate system.".into(),
            ErrorKind::DegenerateGeometry => "Invalid polygon: draw at least three distinct points.".into(),
            ErrorKind::ProductUnavailable => match self {
                Error::ProductUnavailable { product, .. } => format!("No {product} data available for the drawn area."),
                _ => "No data available for the drawn area.".into(),
            },
            ErrorKind::EmptyMask => "The drawn polygon is too small or outside the data area.".into(),
            ErrorKind::MisalignedGrids => "Internal error: data layers are not aligned.".into(),
            ErrorKind::NoValidData => "No valid data inside the drawn polygon.".into(),
            ErrorKind::Internal => "The analysis failed.".into(),
        }
    }

    /// Misaligned grids indicate a programming error and are never recovered from
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::MisalignedGrids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages_hide_details() {
        let err = Error::ProductUnavailable {
            product: "dem_5m".into(),
            reason: "no file intersects EPSG:3577 (1, 2, 3, 4)".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ProductUnavailable);
        assert_eq!(err.status_message(), "No dem_5m data available for the drawn area.");

        let err = Error::from(geo::Error::UnknownCrs(geo::Epsg::new(1)));
        assert_eq!(err.kind(), ErrorKind::UnknownCrs);
        assert!(!err.status_message().contains("EPSG"));

        assert!(Error::MisalignedGrids("size".into()).is_fatal());
        assert!(!Error::NoValidData.is_fatal());
        assert_eq!(Error::from(geo::Error::EmptyMask).kind(), ErrorKind::EmptyMask);
    }
}
