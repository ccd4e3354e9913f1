//! Coordinate reference system identifiers.

/// An EPSG coordinate reference system code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Epsg(u16);

impl Epsg {
    pub const fn new(code: u16) -> Self {
        Epsg(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Returns true if the code is known by the projection database.
    pub fn is_known(&self) -> bool {
        crs_definitions::from_code(self.0).is_some()
    }
}

impl From<u16> for Epsg {
    fn from(code: u16) -> Self {
        Epsg(code)
    }
}

impl From<Epsg> for u16 {
    fn from(epsg: Epsg) -> Self {
        epsg.0
    }
}

impl std::fmt::Display for Epsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl std::str::FromStr for Epsg {
    type Err = crate::Error;

    /// Accepts both `EPSG:3577` and `3577`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let code = code
            .strip_prefix("EPSG:")
            .or_else(|| code.strip_prefix("epsg:"))
            .unwrap_or(code);
        code.parse::<u16>()
            .map(Epsg)
            .map_err(|_| crate::Error::InvalidArgument(format!("Invalid EPSG code: {s}")))
    }
}

pub mod epsg {
    use super::Epsg;

    pub const WGS84: Epsg = Epsg(4326);
    pub const WGS84_WEB_MERCATOR: Epsg = Epsg(3857);
    /// GDA94 / Australian Albers, the working CRS of the Australian land cover products
    pub const GDA94_AUSTRALIAN_ALBERS: Epsg = Epsg(3577);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_epsg() {
        assert_eq!("EPSG:3577".parse::<Epsg>().ok(), Some(epsg::GDA94_AUSTRALIAN_ALBERS));
        assert_eq!("4326".parse::<Epsg>().ok(), Some(epsg::WGS84));
        assert!("EPSG:abc".parse::<Epsg>().is_err());
        assert_eq!(epsg::WGS84.to_string(), "EPSG:4326");
    }

    #[test]
    fn known_codes() {
        assert!(epsg::WGS84.is_known());
        assert!(epsg::GDA94_AUSTRALIAN_ALBERS.is_known());
        assert!(!Epsg::new(1).is_known());
    }
}
