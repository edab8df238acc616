use crate::events::Wiring;
use crate::overlay;
use site_core::aquarium::{ENCLOSURE_MODEL_URL, ENCLOSURE_NODE, TURTLE_MODEL_URL};
use site_core::{MeshData, ModelData, Route};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Parsed aquarium models, ready for upload.
pub struct AquariumModels {
    pub enclosure: MeshData,
    pub turtle: ModelData,
}

/// Lifecycle of the lazily fetched aquarium assets. Only moves forward.
#[derive(Default)]
pub enum AquariumLoad {
    #[default]
    Idle,
    Loading,
    /// Parsed and waiting for the frame loop to upload them.
    Ready(Box<AquariumModels>),
    Installed,
    Failed,
}

impl AquariumLoad {
    /// Take parsed models for upload, marking them installed.
    pub fn take_ready(&mut self) -> Option<Box<AquariumModels>> {
        match std::mem::take(self) {
            AquariumLoad::Ready(models) => {
                *self = AquariumLoad::Installed;
                Some(models)
            }
            other => {
                *self = other;
                None
            }
        }
    }
}

pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch {url}: {:?}", e))?
        .dyn_into::<web::Response>()
        .map_err(|e| anyhow::anyhow!("fetch {url}: {:?}", e))?;
    if !resp.ok() {
        anyhow::bail!("fetch {url}: HTTP {}", resp.status());
    }
    let buf = JsFuture::from(
        resp.array_buffer()
            .map_err(|e| anyhow::anyhow!("read {url}: {:?}", e))?,
    )
    .await
    .map_err(|e| anyhow::anyhow!("read {url}: {:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

pub async fn load_aquarium() -> anyhow::Result<AquariumModels> {
    let enclosure_bytes = fetch_bytes(ENCLOSURE_MODEL_URL).await?;
    let enclosure_model = ModelData::from_slice(&enclosure_bytes)?;
    let enclosure = enclosure_model.mesh_for_node(ENCLOSURE_NODE)?.to_mesh_data();
    let turtle_bytes = fetch_bytes(TURTLE_MODEL_URL).await?;
    let turtle = ModelData::from_slice(&turtle_bytes)?;
    log::info!(
        "[assets] aquarium ready: enclosure tris={} turtle meshes={}",
        enclosure.triangle_count(),
        turtle.meshes.len()
    );
    Ok(AquariumModels { enclosure, turtle })
}

/// Fetch and parse the aquarium in the background. The result is kept even
/// if the visitor has navigated away in the meantime.
pub fn spawn_aquarium_load(w: Wiring) {
    *w.aquarium.borrow_mut() = AquariumLoad::Loading;
    spawn_local(async move {
        match load_aquarium().await {
            Ok(models) => {
                *w.aquarium.borrow_mut() = AquariumLoad::Ready(Box::new(models));
            }
            Err(e) => {
                log::error!("[assets] aquarium load failed: {:?}", e);
                *w.aquarium.borrow_mut() = AquariumLoad::Failed;
                if w.router.borrow().current() == Route::About {
                    overlay::show_loading_failed(&w.document);
                }
            }
        }
    });
}
