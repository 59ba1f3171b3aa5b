//! Interface documents and the merged descriptor set
//!
//! An interface document lists functions and the export sets that select
//! them per target. Any number of documents can be merged; the merged
//! [`DescriptorSet`] is the same however the functions were split across
//! them, as long as the pieces agree with each other.

use crate::descriptor::FunctionDescriptor;
use crate::error::{ConsistencyError, GenerationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// One machine-readable interface document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDocument {
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
    /// Target identifier -> exported function names
    #[serde(default)]
    pub exports: BTreeMap<String, Vec<String>>,
}

impl InterfaceDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GenerationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json_str(&json)?;
        debug!(
            path = %path.display(),
            functions = doc.functions.len(),
            targets = doc.exports.len(),
            "loaded interface document"
        );
        Ok(doc)
    }
}

/// The union of all interface documents for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSet {
    functions: Vec<FunctionDescriptor>,
    exports: BTreeMap<String, BTreeSet<String>>,
}

impl DescriptorSet {
    /// Merge documents into the canonical descriptor list.
    ///
    /// Canonical order is slot order for slotted functions, followed by the
    /// unslotted ones in first-seen order.
    pub fn from_documents<I>(documents: I) -> std::result::Result<Self, ConsistencyError>
    where
        I: IntoIterator<Item = InterfaceDocument>,
    {
        let mut functions: Vec<FunctionDescriptor> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut exports: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for document in documents {
            let mut seen_here = HashSet::new();
            for func in document.functions {
                let func = func.normalize();
                if !seen_here.insert(func.name.clone()) {
                    return Err(ConsistencyError::DuplicateName { name: func.name });
                }
                match index.get(&func.name) {
                    Some(&existing) if functions[existing] != func => {
                        return Err(ConsistencyError::ConflictingDescriptor { name: func.name });
                    }
                    Some(_) => {}
                    None => {
                        index.insert(func.name.clone(), functions.len());
                        functions.push(func);
                    }
                }
            }
            for (target, names) in document.exports {
                exports.entry(target).or_default().extend(names);
            }
        }

        // Stable sort keeps first-seen order among unslotted functions.
        functions.sort_by_key(|func| func.slot.map_or((1, 0), |slot| (0, slot)));

        Ok(Self { functions, exports })
    }

    /// Build a set directly from an ordered list, exporting everything under `targets`.
    pub fn from_functions(functions: Vec<FunctionDescriptor>, targets: &[&str]) -> Self {
        let names: BTreeSet<String> = functions.iter().map(|func| func.name.clone()).collect();
        let exports = targets
            .iter()
            .map(|target| (target.to_string(), names.clone()))
            .collect();
        Self {
            functions: functions.into_iter().map(FunctionDescriptor::normalize).collect(),
            exports,
        }
    }

    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|func| func.name == name)
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }

    pub fn export_names(&self, target: &str) -> Result<&BTreeSet<String>> {
        self.exports
            .get(target)
            .ok_or_else(|| GenerationError::UnknownTarget(target.to_string()))
    }

    /// Add or replace the export set for `target`.
    pub fn set_exports<I, S>(&mut self, target: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports
            .insert(target.to_string(), names.into_iter().map(Into::into).collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_A: &str = r#"{
        "functions": [
            {"name": "glEnd", "return_type": "void", "slot": 1},
            {"name": "glBegin", "return_type": "void", "args": [{"type": "GLenum", "name": "mode"}], "slot": 0}
        ],
        "exports": {"gl": ["glBegin", "glEnd"]}
    }"#;

    const DOC_B: &str = r#"{
        "functions": [
            {"name": "glGetError", "return_type": "GLenum", "slot": 2}
        ],
        "exports": {"gl": ["glGetError"], "glesv1": ["glGetError"]}
    }"#;

    #[test]
    fn test_merge_orders_by_slot() {
        let docs = vec![
            InterfaceDocument::from_json_str(DOC_B).unwrap(),
            InterfaceDocument::from_json_str(DOC_A).unwrap(),
        ];
        let set = DescriptorSet::from_documents(docs).unwrap();
        let names: Vec<_> = set.functions().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["glBegin", "glEnd", "glGetError"]);
        assert_eq!(set.export_names("gl").unwrap().len(), 3);
        assert_eq!(set.export_names("glesv1").unwrap().len(), 1);
        assert_eq!(set.get("glBegin").unwrap().base_name, "Begin");
    }

    #[test]
    fn test_split_is_irrelevant() {
        let single = InterfaceDocument::from_json_str(DOC_A).unwrap();
        let whole = DescriptorSet::from_documents(vec![single.clone()]).unwrap();

        let mut first = single.clone();
        let mut second = InterfaceDocument::default();
        second.functions.push(first.functions.remove(1));
        let split = DescriptorSet::from_documents(vec![second, first]).unwrap();

        assert_eq!(whole.functions(), split.functions());
    }

    #[test]
    fn test_identical_repeat_is_accepted() {
        let doc = InterfaceDocument::from_json_str(DOC_A).unwrap();
        let set = DescriptorSet::from_documents(vec![doc.clone(), doc]).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_conflicting_repeat_is_rejected() {
        let doc = InterfaceDocument::from_json_str(DOC_A).unwrap();
        let mut other = doc.clone();
        other.functions[0].return_type = "GLint".to_string();
        let err = DescriptorSet::from_documents(vec![doc, other]).unwrap_err();
        assert_eq!(
            err,
            ConsistencyError::ConflictingDescriptor {
                name: "glEnd".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_within_document() {
        let mut doc = InterfaceDocument::from_json_str(DOC_A).unwrap();
        doc.functions.push(doc.functions[0].clone());
        assert!(matches!(
            DescriptorSet::from_documents(vec![doc]),
            Err(ConsistencyError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_unknown_target() {
        let set = DescriptorSet::from_documents(vec![InterfaceDocument::from_json_str(DOC_A).unwrap()]).unwrap();
        assert!(matches!(
            set.export_names("egl"),
            Err(GenerationError::UnknownTarget(name)) if name == "egl"
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = InterfaceDocument::from_path("/nonexistent/gl.json").unwrap_err();
        assert!(matches!(err, GenerationError::Io { .. }));
    }
}
