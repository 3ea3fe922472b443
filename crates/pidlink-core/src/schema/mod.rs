//! Declarative property schema.
//!
//! Every externally visible device property is described by one
//! [`PropertyDescriptor`]: its dotted path, wire command, wire primitive
//! type, optional enumerated value list, optional visibility dependency,
//! numeric bounds, and a display hook. The sync engine drives all reads and
//! writes from this table — there is no per-field accessor code.
//!
//! The table is static but not trusted: [`PropertySchema::builtin`]
//! validates it once at process start, so an authoring mistake (duplicate
//! command, dangling `visible_if`, misspelled enum list) fails loudly at
//! startup instead of corrupting a device exchange later.

mod table;
mod value;

pub use table::{ENUM_LISTS, PROPERTIES};
pub use value::{Value, ValueError, WireType};

use std::collections::HashMap;

use thiserror::Error;

use crate::protocol::Command;

/// A named list of `(code, label)` pairs for select-style properties.
#[derive(Debug, Clone, Copy)]
pub struct EnumList {
    pub name: &'static str,
    pub entries: &'static [(u8, &'static str)],
}

impl EnumList {
    /// Label for a code, when the code is in the list.
    pub fn label(&self, code: u8) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }
}

/// Declarative description of one device property.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    /// Dotted path into the decoded configuration, e.g. `"pid.target"`.
    pub path: &'static str,
    /// Wire command addressing this property. `None` for variant-presence
    /// markers, which exist only as `visible_if` targets.
    pub command: Option<Command>,
    pub wire_type: WireType,
    /// Name of an [`EnumList`] constraining this property's values.
    pub enum_list: Option<&'static str>,
    /// Path of another property that must be present (variant active) for
    /// this one to be actionable.
    pub visible_if: Option<&'static str>,
    /// Inclusive numeric bounds.
    pub bounds: Option<(f64, f64)>,
    /// Pure value-to-text hook used when rendering the property.
    pub display: Option<fn(&Value) -> String>,
    /// Whether the property accepts writes (telemetry and markers do not).
    pub writable: bool,
}

impl PropertyDescriptor {
    /// A marker carries no command; it records variant presence for
    /// `visible_if` dependencies.
    pub fn is_marker(&self) -> bool {
        self.command.is_none()
    }
}

/// Schema validation failures, reported at process start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate property path: {0}")]
    DuplicatePath(&'static str),

    #[error("command {command:#04x} is shared by {first} and {second}")]
    DuplicateCommand {
        command: u8,
        first: &'static str,
        second: &'static str,
    },

    #[error("property {path} references undeclared enum list {list}")]
    UnknownEnumList {
        path: &'static str,
        list: &'static str,
    },

    #[error("property {path} has visible_if target {target}, which is not a declared path")]
    UnknownVisibleIf {
        path: &'static str,
        target: &'static str,
    },

    #[error("property {path} declares bounds on non-numeric wire type")]
    BoundsOnNonNumeric { path: &'static str },
}

/// A validated property table with path and command lookup.
#[derive(Debug)]
pub struct PropertySchema {
    descriptors: &'static [PropertyDescriptor],
    enum_lists: &'static [EnumList],
    by_path: HashMap<&'static str, usize>,
    by_command: HashMap<Command, usize>,
}

impl PropertySchema {
    /// Validates and returns the built-in device schema.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::validate(PROPERTIES, ENUM_LISTS)
    }

    /// Validates an arbitrary table (exposed for tests).
    pub fn validate(
        descriptors: &'static [PropertyDescriptor],
        enum_lists: &'static [EnumList],
    ) -> Result<Self, SchemaError> {
        let mut by_path = HashMap::with_capacity(descriptors.len());
        let mut by_command: HashMap<Command, usize> = HashMap::new();

        for (index, descriptor) in descriptors.iter().enumerate() {
            if by_path.insert(descriptor.path, index).is_some() {
                return Err(SchemaError::DuplicatePath(descriptor.path));
            }

            if let Some(command) = descriptor.command {
                if let Some(&earlier) = by_command.get(&command) {
                    return Err(SchemaError::DuplicateCommand {
                        command: command.code(),
                        first: descriptors[earlier].path,
                        second: descriptor.path,
                    });
                }
                by_command.insert(command, index);
            }

            if let Some(list) = descriptor.enum_list {
                if !enum_lists.iter().any(|l| l.name == list) {
                    return Err(SchemaError::UnknownEnumList {
                        path: descriptor.path,
                        list,
                    });
                }
            }

            if descriptor.bounds.is_some() && !descriptor.wire_type.is_numeric() {
                return Err(SchemaError::BoundsOnNonNumeric {
                    path: descriptor.path,
                });
            }
        }

        // Resolved after the path set is complete, so targets may be
        // declared in any order.
        for descriptor in descriptors {
            if let Some(target) = descriptor.visible_if {
                if !by_path.contains_key(target) {
                    return Err(SchemaError::UnknownVisibleIf {
                        path: descriptor.path,
                        target,
                    });
                }
            }
        }

        Ok(Self {
            descriptors,
            enum_lists,
            by_path,
            by_command,
        })
    }

    /// Looks a property up by its dotted path.
    pub fn descriptor(&self, path: &str) -> Option<&PropertyDescriptor> {
        self.by_path.get(path).map(|&i| &self.descriptors[i])
    }

    /// Looks a property up by its wire command.
    pub fn by_command(&self, command: Command) -> Option<&PropertyDescriptor> {
        self.by_command.get(&command).map(|&i| &self.descriptors[i])
    }

    /// All descriptors in declaration order.
    pub fn descriptors(&self) -> &'static [PropertyDescriptor] {
        self.descriptors
    }

    /// Looks an enum list up by name.
    pub fn enum_list(&self, name: &str) -> Option<&EnumList> {
        self.enum_lists.iter().find(|l| l.name == name)
    }

    /// Renders a value through the property's display hook and enum list.
    pub fn render(&self, descriptor: &PropertyDescriptor, value: &Value) -> String {
        if let (Some(list), Value::U8(code)) = (descriptor.enum_list, value) {
            if let Some(label) = self.enum_list(list).and_then(|l| l.label(*code)) {
                return label.to_string();
            }
        }
        match descriptor.display {
            Some(display) => display(value),
            None => value.to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const fn field(path: &'static str, command: Command, wire_type: WireType) -> PropertyDescriptor {
        PropertyDescriptor {
            path,
            command: Some(command),
            wire_type,
            enum_list: None,
            visible_if: None,
            bounds: None,
            display: None,
            writable: true,
        }
    }

    #[test]
    fn test_builtin_schema_validates() {
        let schema = PropertySchema::builtin().expect("builtin schema must be valid");
        assert!(schema.descriptor("pid.target").is_some());
        assert!(schema.by_command(Command::PidTarget).is_some());
    }

    #[test]
    fn test_duplicate_command_is_rejected() {
        static BAD: &[PropertyDescriptor] = &[
            field("a", Command::Power, WireType::Bool),
            field("b", Command::Power, WireType::Bool),
        ];

        let err = PropertySchema::validate(BAD, &[]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateCommand {
                command: Command::Power.code(),
                first: "a",
                second: "b",
            }
        );
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        static BAD: &[PropertyDescriptor] = &[
            field("a", Command::Power, WireType::Bool),
            field("a", Command::PidReverse, WireType::Bool),
        ];

        assert_eq!(
            PropertySchema::validate(BAD, &[]).unwrap_err(),
            SchemaError::DuplicatePath("a")
        );
    }

    #[test]
    fn test_dangling_visible_if_is_rejected() {
        static BAD: &[PropertyDescriptor] = &[PropertyDescriptor {
            visible_if: Some("missing.marker"),
            ..field("a", Command::Power, WireType::Bool)
        }];

        assert_eq!(
            PropertySchema::validate(BAD, &[]).unwrap_err(),
            SchemaError::UnknownVisibleIf {
                path: "a",
                target: "missing.marker",
            }
        );
    }

    #[test]
    fn test_unknown_enum_list_is_rejected() {
        static BAD: &[PropertyDescriptor] = &[PropertyDescriptor {
            enum_list: Some("no_such_list"),
            ..field("a", Command::Power, WireType::U8)
        }];

        assert_eq!(
            PropertySchema::validate(BAD, &[]).unwrap_err(),
            SchemaError::UnknownEnumList {
                path: "a",
                list: "no_such_list",
            }
        );
    }

    #[test]
    fn test_bounds_on_text_are_rejected() {
        static BAD: &[PropertyDescriptor] = &[PropertyDescriptor {
            bounds: Some((0.0, 1.0)),
            ..field("a", Command::MdnsName, WireType::FixedString(32))
        }];

        assert_eq!(
            PropertySchema::validate(BAD, &[]).unwrap_err(),
            SchemaError::BoundsOnNonNumeric { path: "a" }
        );
    }

    #[test]
    fn test_visible_if_target_may_be_declared_later() {
        static OK: &[PropertyDescriptor] = &[
            PropertyDescriptor {
                visible_if: Some("marker"),
                ..field("a", Command::Power, WireType::Bool)
            },
            PropertyDescriptor {
                path: "marker",
                command: None,
                wire_type: WireType::Bool,
                enum_list: None,
                visible_if: None,
                bounds: None,
                display: None,
                writable: false,
            },
        ];

        assert!(PropertySchema::validate(OK, &[]).is_ok());
    }

    #[test]
    fn test_render_prefers_enum_label() {
        let schema = PropertySchema::builtin().unwrap();
        let descriptor = schema.descriptor("sensor.type").unwrap();
        assert_eq!(schema.render(descriptor, &Value::U8(0)), "Analog");
        assert_eq!(schema.render(descriptor, &Value::U8(1)), "DigitalTemp");
        // Codes outside the list fall back to plain rendering.
        assert_eq!(schema.render(descriptor, &Value::U8(7)), "7");
    }
}
