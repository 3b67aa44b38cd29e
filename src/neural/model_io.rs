//! Model I/O utilities using safetensors format
//!
//! Checkpoints are plain named F32 tensors so that weights exported by the
//! training side can be loaded without a libtorch install.

use crate::{Result, RetroError};
use safetensors::serialize_to_file;
use safetensors::tensor::{Dtype, SafeTensors, TensorView};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Row-major F32 tensor held in host memory.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl DenseTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(RetroError::Artifact(format!(
                "tensor shape {:?} needs {} values, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }
}

/// Load every tensor of a safetensors file, converting to F32.
pub fn load_tensors(path: impl AsRef<Path>) -> Result<HashMap<String, DenseTensor>> {
    let buffer = fs::read(path.as_ref())?;
    let tensors = SafeTensors::deserialize(&buffer)?;

    let mut loaded = HashMap::new();
    for (name, view) in tensors.tensors() {
        let tensor = view_to_dense(&name, &view)?;
        loaded.insert(name, tensor);
    }

    log::debug!(
        "Loaded {} tensors from {}",
        loaded.len(),
        path.as_ref().display()
    );
    Ok(loaded)
}

/// Save named F32 tensors to a safetensors file.
pub fn save_tensors(
    tensors: &HashMap<String, DenseTensor>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let bytes: HashMap<&String, Vec<u8>> = tensors
        .iter()
        .map(|(name, tensor)| {
            let data: Vec<u8> = tensor.data.iter().flat_map(|x| x.to_le_bytes()).collect();
            (name, data)
        })
        .collect();

    let mut views = HashMap::new();
    for (name, data) in &bytes {
        let view = TensorView::new(Dtype::F32, tensors[*name].shape.clone(), data)?;
        views.insert((*name).clone(), view);
    }

    serialize_to_file(views, &None, path.as_ref())?;
    Ok(())
}

fn view_to_dense(name: &str, view: &TensorView<'_>) -> Result<DenseTensor> {
    let data: Vec<f32> = match view.dtype() {
        Dtype::F32 => view
            .data()
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        Dtype::F64 => view
            .data()
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32)
            .collect(),
        other => {
            return Err(RetroError::Artifact(format!(
                "tensor '{}' has unsupported dtype {:?}",
                name, other
            )))
        }
    };
    DenseTensor::new(view.shape().to_vec(), data)
}
