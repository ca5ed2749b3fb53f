//! Form-to-table entries from the `crfs` worksheet.

use serde::{Deserialize, Serialize};

/// Name of the worksheet describing forms.
pub const CRFS_WORKSHEET: &str = "crfs";

/// One row of the `crfs` worksheet. Absent values are omitted from JSON.
///
/// Field order matches the manifest layout consumed by the survey application,
/// which differs from the worksheet column order (see [`CrfsColumn`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrfsEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbase: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primarykey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkingfield: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idconfig: Option<IdConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parenttable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incrementfield: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requireslink: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_count_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_repeat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_enforce_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_fields: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_condition: Option<String>,
}

/// Participant ID layout stored as JSON in the `idconfig` cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<IdConfigField>>,
    #[serde(
        rename = "incrementLength",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub increment_length: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdConfigField {
    pub name: String,
    pub length: i64,
}

/// Worksheet columns of `crfs`, in positional order (column 1 first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrfsColumn {
    DisplayOrder,
    Tablename,
    Displayname,
    Primarykey,
    Idconfig,
    Isbase,
    Linkingfield,
    Parenttable,
    Incrementfield,
    Requireslink,
    RepeatCountField,
    AutoStartRepeat,
    RepeatEnforceCount,
    DisplayFields,
    EntryCondition,
}

impl CrfsColumn {
    pub const ALL: [CrfsColumn; 15] = [
        Self::DisplayOrder,
        Self::Tablename,
        Self::Displayname,
        Self::Primarykey,
        Self::Idconfig,
        Self::Isbase,
        Self::Linkingfield,
        Self::Parenttable,
        Self::Incrementfield,
        Self::Requireslink,
        Self::RepeatCountField,
        Self::AutoStartRepeat,
        Self::RepeatEnforceCount,
        Self::DisplayFields,
        Self::EntryCondition,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::DisplayOrder => "display_order",
            Self::Tablename => "tablename",
            Self::Displayname => "displayname",
            Self::Primarykey => "primarykey",
            Self::Idconfig => "idconfig",
            Self::Isbase => "isbase",
            Self::Linkingfield => "linkingfield",
            Self::Parenttable => "parenttable",
            Self::Incrementfield => "incrementfield",
            Self::Requireslink => "requireslink",
            Self::RepeatCountField => "repeat_count_field",
            Self::AutoStartRepeat => "auto_start_repeat",
            Self::RepeatEnforceCount => "repeat_enforce_count",
            Self::DisplayFields => "display_fields",
            Self::EntryCondition => "entry_condition",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::DisplayOrder
                | Self::Isbase
                | Self::Requireslink
                | Self::AutoStartRepeat
                | Self::RepeatEnforceCount
        )
    }
}
