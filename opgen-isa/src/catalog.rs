use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::{CatalogError, Result};
use crate::opcode::{FrameKind, OPCODE_WIDTH, Opcode, OpcodeFlags, OpcodeInfo};

/// An ordered, validated list of opcode descriptors.
///
/// Ids and names are unique. Iteration follows declaration order.
///
/// ```
/// use opgen_isa::{Catalog, Opcode};
///
/// let catalog = Catalog::from_yaml_str(
///     "opcodes:\n  - { name: pop, id: 1, execute: ['sp -= 1;'] }\n",
/// )?;
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.lookup(Opcode(1)).unwrap().name(), "pop");
/// # Ok::<(), opgen_isa::CatalogError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    opcodes: Vec<OpcodeInfo>,
    by_id: HashMap<Opcode, usize>,
    default_body: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDoc {
    #[serde(default)]
    default: Option<Vec<String>>,
    #[serde(default)]
    opcodes: Vec<OpcodeDoc>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OpcodeDoc {
    name: String,
    id: u32,
    #[serde(default)]
    length: Option<u8>,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    results: Vec<String>,
    #[serde(default)]
    execute: Option<Vec<String>>,
}

impl OpcodeDoc {
    fn into_info(self) -> Result<OpcodeInfo> {
        let id = u16::try_from(self.id).map_err(|_| CatalogError::IdOutOfRange {
            name: self.name.clone(),
            id: self.id,
        })?;

        let mut flags = OpcodeFlags::empty();
        for flag in &self.flags {
            flags |= OpcodeFlags::from_catalog_name(flag).ok_or_else(|| {
                CatalogError::UnknownFlag {
                    name: self.name.clone(),
                    flag: flag.clone(),
                }
            })?;
        }

        let results = self
            .results
            .iter()
            .map(|kind| {
                FrameKind::from_name(kind).ok_or_else(|| CatalogError::UnknownFrameKind {
                    name: self.name.clone(),
                    kind: kind.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut info = OpcodeInfo::new(self.name, id)
            .with_flags(flags)
            .with_length(self.length.unwrap_or(OPCODE_WIDTH))
            .with_results(results);
        if let Some(lines) = self.execute {
            info = info.with_execute(lines);
        }
        Ok(info)
    }
}

impl Catalog {
    /// Build a catalog from descriptors, validating ids, names, and lengths.
    pub fn new(opcodes: Vec<OpcodeInfo>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(opcodes.len());
        let mut names = HashSet::with_capacity(opcodes.len());

        for (idx, info) in opcodes.iter().enumerate() {
            if info.name().is_empty() {
                return Err(CatalogError::EmptyName(info.opcode().raw()));
            }
            if info.length() < OPCODE_WIDTH {
                return Err(CatalogError::LengthTooSmall {
                    name: info.name().to_string(),
                    length: info.length(),
                });
            }
            if let Some(&prev) = by_id.get(&info.opcode()) {
                let first: &OpcodeInfo = &opcodes[prev];
                return Err(CatalogError::DuplicateId {
                    id: info.opcode().raw(),
                    first: first.name().to_string(),
                    second: info.name().to_string(),
                });
            }
            if !names.insert(info.name()) {
                return Err(CatalogError::DuplicateName(info.name().to_string()));
            }
            by_id.insert(info.opcode(), idx);
        }

        Ok(Self {
            opcodes,
            by_id,
            default_body: None,
        })
    }

    /// Parse a catalog from a YAML document.
    pub fn from_yaml_str(src: &str) -> Result<Self> {
        let doc: CatalogDoc = serde_yaml::from_str(src)?;
        let opcodes = doc
            .opcodes
            .into_iter()
            .map(OpcodeDoc::into_info)
            .collect::<Result<Vec<_>>>()?;

        let mut catalog = Self::new(opcodes)?;
        catalog.default_body = doc.default;
        log::debug!(
            "loaded catalog: {} opcodes, default body: {}",
            catalog.len(),
            catalog.default_body.is_some()
        );
        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
        Self::from_yaml_str(&src)
    }

    /// Attach raw source lines for the catch-all branch.
    pub fn with_default_body<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_body = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Raw source lines for the catch-all branch, if declared.
    pub fn default_body(&self) -> Option<&[String]> {
        self.default_body.as_deref()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OpcodeInfo> {
        self.opcodes.iter()
    }

    pub fn opcodes(&self) -> &[OpcodeInfo] {
        &self.opcodes
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    pub fn lookup(&self, opcode: Opcode) -> Option<&OpcodeInfo> {
        self.by_id.get(&opcode).map(|&idx| &self.opcodes[idx])
    }

    pub fn by_name(&self, name: &str) -> Option<&OpcodeInfo> {
        self.opcodes.iter().find(|info| info.name() == name)
    }

    /// Number of opcodes flagged instrumentation-only.
    pub fn instrumentation_only_count(&self) -> usize {
        self.opcodes
            .iter()
            .filter(|info| info.is_instrumentation_only())
            .count()
    }

    /// Smallest and largest id in the catalog.
    pub fn id_range(&self) -> Option<(Opcode, Opcode)> {
        let min = self.opcodes.iter().map(OpcodeInfo::opcode).min()?;
        let max = self.opcodes.iter().map(OpcodeInfo::opcode).max()?;
        Some((min, max))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a OpcodeInfo;
    type IntoIter = std::slice::Iter<'a, OpcodeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
