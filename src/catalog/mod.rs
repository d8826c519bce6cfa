//! Static catalog of models the service knows how to load.
//!
//! The catalog is compiled in and never mutated; everything else refers to entries by
//! `&'static` reference.


use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Parameter-count class of a model.
pub enum ParameterClass {
    /// ~0.5B parameters.
    HalfB,
    /// ~1.5B parameters.
    OneAndHalfB,
    /// ~7B parameters.
    SevenB,
    /// ~14B parameters.
    FourteenB,
}

impl ParameterClass {
    /// Display label (`"0.5B"`, `"7B"`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            ParameterClass::HalfB => "0.5B",
            ParameterClass::OneAndHalfB => "1.5B",
            ParameterClass::SevenB => "7B",
            ParameterClass::FourteenB => "14B",
        }
    }

    /// Returns `true` for 7B and larger classes.
    ///
    /// Large classes get a lower sampling temperature and INT8 quantization.
    pub fn is_large(&self) -> bool {
        matches!(self, ParameterClass::SevenB | ParameterClass::FourteenB)
    }
}

impl std::fmt::Display for ParameterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One loadable model.
pub struct ModelDescriptor {
    /// Short identifier used by the API (`"qwen-0.5b"`).
    pub id: &'static str,
    /// Backing model path / hub name handed to the engine.
    pub model_path: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Parameter-count class.
    pub size: ParameterClass,
    /// Recommended accelerator memory, in GiB.
    pub vram_gb: u32,
    /// Recommended professors per batch.
    pub recommended_batch_size: usize,
}

/// Every model the service can load.
pub const MODEL_CATALOG: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "qwen-0.5b",
        model_path: "Qwen/Qwen2.5-0.5B-Instruct",
        name: "Qwen2.5-0.5B-Instruct",
        size: ParameterClass::HalfB,
        vram_gb: 4,
        recommended_batch_size: 20,
    },
    ModelDescriptor {
        id: "qwen-1.5b",
        model_path: "Qwen/Qwen2.5-1.5B-Instruct",
        name: "Qwen2.5-1.5B-Instruct",
        size: ParameterClass::OneAndHalfB,
        vram_gb: 8,
        recommended_batch_size: 15,
    },
    ModelDescriptor {
        id: "qwen-7b",
        model_path: "Qwen/Qwen2.5-7B-Instruct",
        name: "Qwen2.5-7B-Instruct",
        size: ParameterClass::SevenB,
        vram_gb: 16,
        recommended_batch_size: 8,
    },
];

/// Looks up a catalog entry by id.
pub fn find_model(id: &str) -> Option<&'static ModelDescriptor> {
    MODEL_CATALOG.iter().find(|m| m.id == id)
}

/// Comma-separated list of known ids (for error messages).
pub fn available_ids() -> String {
    MODEL_CATALOG
        .iter()
        .map(|m| m.id)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Wire view of a catalog entry (`GET /models`).
pub struct CatalogEntry {
    pub id: &'static str,
    pub model_path: &'static str,
    pub name: &'static str,
    pub size: &'static str,
    pub vram: String,
    pub recommended_batch_size: usize,
}

impl From<&ModelDescriptor> for CatalogEntry {
    fn from(m: &ModelDescriptor) -> Self {
        Self {
            id: m.id,
            model_path: m.model_path,
            name: m.name,
            size: m.size.label(),
            vram: format!("{}GB", m.vram_gb),
            recommended_batch_size: m.recommended_batch_size,
        }
    }
}

/// The whole catalog in wire form.
pub fn catalog_entries() -> Vec<CatalogEntry> {
    MODEL_CATALOG.iter().map(CatalogEntry::from).collect()
}
