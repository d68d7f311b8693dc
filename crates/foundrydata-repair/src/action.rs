//! `repairAction` records (§4.6): one per safe edit applied.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RepairActionKind {
    RenameProperty,
    CoercePatternEnum,
    FillRequiredDefault,
    DropExtraneousProperty,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepairAction {
    pub action: RepairActionKind,
    #[serde(rename = "canonPath", skip_serializing_if = "Option::is_none")]
    pub canon_path: Option<String>,
    #[serde(rename = "origPath", skip_serializing_if = "Option::is_none")]
    pub orig_path: Option<String>,
    #[serde(rename = "instancePath")]
    pub instance_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
