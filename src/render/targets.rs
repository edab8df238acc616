use super::helpers;

pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen targets for the scene and post chain.
///
/// - `hdr_*` hold the main scene color in Rgba16Float.
/// - `backbuffer_*` is a copy of the HDR color taken before each glass pass;
///   transmissive materials refract it.
/// - `depth_*` is the scene depth, also read by the AO pass.
/// - `bloom_*` are half-res buffers used for bright-pass and blur.
pub(crate) struct RenderTargets {
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) backbuffer_tex: wgpu::Texture,
    pub(crate) backbuffer_view: wgpu::TextureView,
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let usage_rt = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (hdr_tex, hdr_view) = helpers::create_color_texture(
            device,
            "hdr_tex",
            width,
            height,
            HDR_FORMAT,
            usage_rt | wgpu::TextureUsages::COPY_SRC,
        );
        let (backbuffer_tex, backbuffer_view) = helpers::create_color_texture(
            device,
            "backbuffer_tex",
            width,
            height,
            HDR_FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, "scene_depth", width, height);
        let bw = (width.max(1) / 2).max(1);
        let bh = (height.max(1) / 2).max(1);
        let (bloom_a, bloom_a_view) =
            helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT, usage_rt);
        let (bloom_b, bloom_b_view) =
            helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT, usage_rt);
        Self {
            hdr_tex,
            hdr_view,
            backbuffer_tex,
            backbuffer_view,
            depth_tex,
            depth_view,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height);
    }

    pub(crate) fn bloom_size(&self) -> [f32; 2] {
        [
            (self.width / 2).max(1) as f32,
            (self.height / 2).max(1) as f32,
        ]
    }

    /// Snapshot the HDR color into the backbuffer for refraction.
    pub(crate) fn capture_backbuffer(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.hdr_tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: &self.backbuffer_tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }
}
