use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    begin_load_pass, create_instanced_pipeline, create_viewport_ubo, ensure_capacity,
    viewport_ubo_layout_entry, UnitQuad, ViewportUniform,
};

/// Renderer for `DrawCmd::RoundedRect`.
///
/// Solid fill with an optional anti-aliased inner border; each instance may be
/// rotated about its top-left corner.
#[derive(Default)]
pub struct RoundedRectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad: Option<UnitQuad>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl RoundedRectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let instances = build_instances(draw_list);
        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(UnitQuad::new(ctx, "gradation rounded_rect"));
        }
        self.ensure_bindings(ctx);
        ensure_capacity::<RoundedRectInstance>(
            ctx,
            "gradation rounded_rect instance vbo",
            wgpu::BufferUsages::VERTEX,
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            instances.len(),
            64,
        );

        let (Some(pipeline), Some(bind_group), Some(quad), Some(ubo), Some(ivbo)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.quad.as_ref(),
            self.viewport_ubo.as_ref(),
            self.instance_vbo.as_ref(),
        ) else {
            return;
        };

        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
        ctx.queue.write_buffer(ivbo, 0, bytemuck::cast_slice(&instances));

        let mut rpass = begin_load_pass(target, "gradation rounded_rect pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, ivbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..instances.len() as u32);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gradation rounded_rect shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rounded_rect.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gradation rounded_rect bgl"),
                entries: &[viewport_ubo_layout_entry()],
            });

        let pipeline = create_instanced_pipeline(
            ctx,
            "gradation rounded_rect",
            &shader,
            &bind_group_layout,
            RoundedRectInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return; };

        let viewport_ubo = create_viewport_ubo(ctx, "gradation rounded_rect viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradation rounded_rect bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

fn build_instances(draw_list: &mut DrawList) -> Vec<RoundedRectInstance> {
    let mut instances = Vec::new();

    for item in draw_list.iter_in_paint_order() {
        let DrawCmd::RoundedRect(cmd) = &item.cmd else { continue; };

        let r = cmd.rect.normalized();
        if r.is_empty() || !r.is_finite() {
            continue;
        }

        let (border_width, border_color) = match &cmd.border {
            Some(b) => (b.width.max(0.0), b.color.to_array()),
            None => (0.0, [0.0f32; 4]),
        };

        instances.push(RoundedRectInstance {
            origin: [r.origin.x, r.origin.y],
            size: [r.size.x, r.size.y],
            params: [cmd.radius.max(0.0), border_width, cmd.rotation, 0.0],
            fill: cmd.fill.to_array(),
            border_color,
        });
    }

    instances
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (64 bytes):
///
///  offset  0  origin        [f32; 2]   loc 1
///  offset  8  size          [f32; 2]   loc 2
///  offset 16  params        [f32; 4]   loc 3  (radius, border width, rotation, _)
///  offset 32  fill          [f32; 4]   loc 4
///  offset 48  border_color  [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RoundedRectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    params: [f32; 4],
    fill: [f32; 4],
    border_color: [f32; 4],
}

impl RoundedRectInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4, // params
        4 => Float32x4, // fill
        5 => Float32x4  // border_color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RoundedRectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
