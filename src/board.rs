use serde::{Serialize, Serializer};

use HeaderPin::{Gpio, Named};

// Alternate function groups and which header pins they claim. Only the
// enabled flag travels in the full-state snapshot; the member pins are
// board documentation.
pub struct FunctionGroup {
    pub name: &'static str,
    pub enabled: bool,
    pub pins: &'static [(usize, &'static str)],
}

pub const FUNCTION_GROUPS: &[FunctionGroup] = &[
    FunctionGroup {
        name: "I2C0",
        enabled: false,
        pins: &[(0, "SDA"), (1, "SCL")],
    },
    FunctionGroup {
        name: "I2C1",
        enabled: true,
        pins: &[(2, "SDA"), (3, "SCL")],
    },
    FunctionGroup {
        name: "SPI0",
        enabled: false,
        pins: &[(7, "CE1"), (8, "CE0"), (9, "MISO"), (10, "MOSI"), (11, "SCLK")],
    },
    FunctionGroup {
        name: "UART0",
        enabled: true,
        pins: &[(14, "TX"), (15, "RX")],
    },
];

// 26-pin header entries are either a supply rail name or a GPIO number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPin {
    Named(&'static str),
    Gpio(u8),
}

impl Serialize for HeaderPin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HeaderPin::Named(name) => serializer.serialize_str(name),
            HeaderPin::Gpio(n) => serializer.serialize_u8(*n),
        }
    }
}

pub const HEADER_MAP_R1: [HeaderPin; 26] = [
    Named("V33"),
    Named("V50"),
    Gpio(0),
    Named("V50"),
    Gpio(1),
    Named("GND"),
    Gpio(4),
    Gpio(14),
    Named("GND"),
    Gpio(15),
    Gpio(17),
    Gpio(18),
    Gpio(21),
    Named("GND"),
    Gpio(22),
    Gpio(23),
    Named("V33"),
    Gpio(24),
    Gpio(10),
    Named("GND"),
    Gpio(9),
    Gpio(25),
    Gpio(11),
    Gpio(8),
    Named("GND"),
    Gpio(7),
];

pub const HEADER_MAP_R2: [HeaderPin; 26] = [
    Named("V33"),
    Named("V50"),
    Gpio(2),
    Named("V50"),
    Gpio(3),
    Named("GND"),
    Gpio(4),
    Gpio(14),
    Named("GND"),
    Gpio(15),
    Gpio(17),
    Gpio(18),
    Gpio(27),
    Named("GND"),
    Gpio(22),
    Gpio(23),
    Named("V33"),
    Gpio(24),
    Gpio(10),
    Named("GND"),
    Gpio(9),
    Gpio(25),
    Gpio(11),
    Gpio(8),
    Named("GND"),
    Gpio(7),
];

pub fn header_map(revision: u8) -> &'static [HeaderPin; 26] {
    match revision {
        1 => &HEADER_MAP_R1,
        _ => &HEADER_MAP_R2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision2_map_serializes_mixed() {
        let json = serde_json::to_string(&HEADER_MAP_R2).unwrap();
        assert!(json.starts_with(r#"["V33","V50",2,"V50",3,"GND",4,"#));
        assert!(json.ends_with(r#","GND",7]"#));
    }

    #[test]
    fn revisions_differ_where_expected() {
        assert_eq!(HEADER_MAP_R1[2], Gpio(0));
        assert_eq!(HEADER_MAP_R2[2], Gpio(2));
        assert_eq!(HEADER_MAP_R1[4], Gpio(1));
        assert_eq!(HEADER_MAP_R2[4], Gpio(3));
        assert_eq!(HEADER_MAP_R1[12], Gpio(21));
        assert_eq!(HEADER_MAP_R2[12], Gpio(27));
    }

    #[test]
    fn unknown_revision_falls_back_to_rev2() {
        assert_eq!(header_map(0), &HEADER_MAP_R2);
        assert_eq!(header_map(3), &HEADER_MAP_R2);
        assert_eq!(header_map(1), &HEADER_MAP_R1);
    }

    #[test]
    fn serial_console_group_is_enabled() {
        let uart = FUNCTION_GROUPS.iter().find(|g| g.name == "UART0").unwrap();
        assert!(uart.enabled);
        assert_eq!(uart.pins, &[(14, "TX"), (15, "RX")]);
    }
}
