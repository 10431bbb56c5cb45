//! Loadout text codec.
//!
//! The shareable loadout document is line based:
//!
//! ```text
//! LOADOUT // <name>
//! EQUIP // <itemHash>:<itemInstanceId> // <display name>
//! SOCKET // <itemHash>:<itemInstanceId>::index:<n>::plug:<plugHash> // <display name>
//! EXTRA // <itemHash>:<itemInstanceId> // <display name>
//! ```
//!
//! Display names are informational: parsing ignores them and serializing
//! regenerates them from the catalog. Parsing is lenient about numbers
//! (malformed values become 0 or empty) and ignores unknown lines, but
//! rejects documents without items and sockets without a plug.

use crate::catalog::ItemCatalog;
use crate::loadout::{LoadoutSpec, SocketAssignment};
use crate::value_objects::{ItemHash, ItemRef};

const SEPARATOR: &str = "//";

/// Errors raised while parsing loadout text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No EQUIP or EXTRA entries
    #[error("Loadout text is empty: no EQUIP or EXTRA entries")]
    Empty,

    /// SOCKET line with a zero or absent plug hash
    #[error("Line {line}: socket assignment for {item} has no plug")]
    MissingPlug {
        /// 1-based line number
        line: usize,
        /// Item the socket line names
        item: ItemRef,
    },

    /// SOCKET line naming an item no preceding EQUIP/EXTRA line listed
    #[error("Line {line}: socket assignment for {item} does not follow an EQUIP or EXTRA entry")]
    OrphanSocket {
        /// 1-based line number
        line: usize,
        /// Item the socket line names
        item: ItemRef,
    },
}

/// Parse loadout text.
///
/// `default_name` is used when the document has no `LOADOUT //` line.
///
/// # Errors
/// See [`ParseError`].
pub fn parse(text: &str, default_name: &str) -> Result<LoadoutSpec, ParseError> {
    let mut spec = LoadoutSpec::new(default_name);

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((directive, rest)) = line.split_once(SEPARATOR) else {
            continue;
        };

        match directive.trim().to_ascii_uppercase().as_str() {
            "LOADOUT" => {
                let name = rest.trim();
                if !name.is_empty() {
                    spec.name = name.to_string();
                }
            },
            "EQUIP" => spec.equip.push(ItemRef::parse_lenient(payload(rest))),
            "EXTRA" => spec.extra.push(ItemRef::parse_lenient(payload(rest))),
            "SOCKET" => {
                let assignment = parse_socket(payload(rest));
                let line = index + 1;

                if assignment.plug_hash.is_zero() {
                    return Err(ParseError::MissingPlug {
                        line,
                        item: assignment.item,
                    });
                }
                if !spec.lists(&assignment.item) {
                    return Err(ParseError::OrphanSocket {
                        line,
                        item: assignment.item,
                    });
                }

                spec.sockets.push(assignment);
            },
            _ => {},
        }
    }

    if spec.equip.is_empty() && spec.extra.is_empty() {
        return Err(ParseError::Empty);
    }

    Ok(spec)
}

/// Serialize a loadout, naming items through the catalog.
///
/// Each item's SOCKET lines follow the item's first EQUIP/EXTRA line.
pub fn serialize(spec: &LoadoutSpec, catalog: &impl ItemCatalog) -> String {
    let mut out = format!("LOADOUT {} {}\n", SEPARATOR, spec.name);
    let mut written: Vec<&ItemRef> = Vec::new();

    let sections = [("EQUIP", &spec.equip), ("EXTRA", &spec.extra)];
    for (directive, items) in sections {
        for item in items.iter() {
            out.push_str(&format!(
                "{} {} {} {} {}\n",
                directive,
                SEPARATOR,
                item,
                SEPARATOR,
                catalog.display_name(item.item_hash)
            ));

            if written.iter().any(|w| w.same_item(item)) {
                continue;
            }
            written.push(item);

            for socket in spec.sockets_for(item) {
                out.push_str(&format!(
                    "SOCKET {} {}::index:{}::plug:{} {} {}\n",
                    SEPARATOR,
                    socket.item,
                    socket.socket_index,
                    socket.plug_hash,
                    SEPARATOR,
                    catalog.display_name(socket.plug_hash)
                ));
            }
        }
    }

    out
}

/// Field between the directive and the display name
fn payload(rest: &str) -> &str {
    rest.split(SEPARATOR).next().unwrap_or_default().trim()
}

/// `<hash>:<instance>::index:<n>::plug:<plugHash>`
fn parse_socket(payload: &str) -> SocketAssignment {
    let mut parts = payload.split("::");
    let item = ItemRef::parse_lenient(parts.next().unwrap_or_default());

    let mut socket_index = 0;
    let mut plug_hash = ItemHash::default();
    for part in parts {
        match part.split_once(':') {
            Some(("index", value)) => socket_index = value.trim().parse().unwrap_or(0),
            Some(("plug", value)) => plug_hash = ItemHash::parse_lenient(value),
            _ => {},
        }
    }

    SocketAssignment {
        item,
        socket_index,
        plug_hash,
    }
}

// =============================================================================
// Tests
// =============================================================================
