use bytemuck::{Pod, Zeroable};

use crate::paint::{Color, Paint};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    begin_load_pass, create_instanced_pipeline, create_viewport_ubo, ensure_capacity,
    viewport_ubo_layout_entry, UnitQuad, ViewportUniform,
};

/// Number of samples baked per gradient.
pub const RAMP_LEN: usize = 256;

/// Renderer for `DrawCmd::Rect`.
///
/// Supported paints:
/// - `Paint::Solid`
/// - `Paint::LinearGradient` with any number of stops. Each gradient is baked
///   into a `RAMP_LEN`-entry color ramp stored in a storage buffer and looked
///   up per fragment along the gradient axis.
///
/// Borders are painted inside the rect bounds.
#[derive(Default)]
pub struct RectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad: Option<UnitQuad>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    ramp_sbo: Option<wgpu::Buffer>,
    ramp_capacity: usize,
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every `DrawCmd::Rect` in `draw_list` into `target`, in paint order.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let (instances, ramps) = build_instances(draw_list);
        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(UnitQuad::new(ctx, "gradation rect"));
        }
        if self.viewport_ubo.is_none() {
            self.viewport_ubo = Some(create_viewport_ubo(ctx, "gradation rect viewport ubo"));
        }

        ensure_capacity::<RectInstance>(
            ctx,
            "gradation rect instance vbo",
            wgpu::BufferUsages::VERTEX,
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            instances.len(),
            64,
        );
        // The ramp buffer is bound even when no gradient is drawn this frame.
        let regrown = ensure_capacity::<[f32; 4]>(
            ctx,
            "gradation rect ramp sbo",
            wgpu::BufferUsages::STORAGE,
            &mut self.ramp_sbo,
            &mut self.ramp_capacity,
            ramps.len().max(1),
            RAMP_LEN,
        );
        if regrown {
            self.bind_group = None;
        }
        self.ensure_bind_group(ctx);

        let (Some(pipeline), Some(bind_group), Some(quad), Some(ubo), Some(ivbo), Some(ramp_sbo)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.quad.as_ref(),
            self.viewport_ubo.as_ref(),
            self.instance_vbo.as_ref(),
            self.ramp_sbo.as_ref(),
        ) else {
            return;
        };

        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
        ctx.queue.write_buffer(ivbo, 0, bytemuck::cast_slice(&instances));
        if !ramps.is_empty() {
            ctx.queue.write_buffer(ramp_sbo, 0, bytemuck::cast_slice(&ramps));
        }

        let mut rpass = begin_load_pass(target, "gradation rect pass");
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
            label: Some("gradation rect shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rect.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gradation rect bgl"),
                entries: &[
                    viewport_ubo_layout_entry(),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let pipeline = create_instanced_pipeline(
            ctx,
            "gradation rect",
            &shader,
            &bind_group_layout,
            RectInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
    }

    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let (Some(bgl), Some(ubo), Some(ramp_sbo)) = (
            self.bind_group_layout.as_ref(),
            self.viewport_ubo.as_ref(),
            self.ramp_sbo.as_ref(),
        ) else {
            return;
        };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradation rect bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: ramp_sbo.as_entire_binding() },
            ],
        }));
    }
}

// ── instance building ─────────────────────────────────────────────────────

/// Converts the rect commands of `draw_list` into GPU instances plus the
/// concatenated gradient ramps they index into.
fn build_instances(draw_list: &mut DrawList) -> (Vec<RectInstance>, Vec<[f32; 4]>) {
    let mut instances = Vec::new();
    let mut ramps: Vec<[f32; 4]> = Vec::new();

    for item in draw_list.iter_in_paint_order() {
        let DrawCmd::Rect(cmd) = &item.cmd else { continue };

        let r = cmd.rect.normalized();
        if r.is_empty() || !r.is_finite() {
            continue;
        }

        let mut inst = RectInstance {
            origin: [r.origin.x, r.origin.y],
            size: [r.size.x, r.size.y],
            ..RectInstance::zeroed()
        };

        match &cmd.paint {
            Paint::Solid(c) => inst.color = c.to_array(),
            Paint::LinearGradient(g) => match g.stops() {
                [] => inst.color = Color::TRANSPARENT.to_array(),
                [only] => inst.color = only.color.to_array(),
                _ => {
                    inst.grad_p0 = [g.start.x, g.start.y];
                    inst.grad_p1 = [g.end.x, g.end.y];
                    inst.ramp = [ramps.len() as u32, RAMP_LEN as u32, 0, 0];
                    ramps.extend(g.bake_ramp(RAMP_LEN).into_iter().map(Color::to_array));
                }
            },
        }

        if let Some(b) = &cmd.border {
            inst.border_width_pad = [b.width.max(0.0), 0.0];
            inst.border_color = b.color.to_array();
        }

        instances.push(inst);
    }

    (instances, ramps)
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (96 bytes):
///
///  offset  0  origin           [f32; 2]   loc 1
///  offset  8  size             [f32; 2]   loc 2
///  offset 16  color            [f32; 4]   loc 3  (solid fill)
///  offset 32  grad_p0          [f32; 2]   loc 4
///  offset 40  grad_p1          [f32; 2]   loc 5
///  offset 48  border_color     [f32; 4]   loc 6
///  offset 64  border_width_pad [f32; 2]   loc 7  (.x = border width)
///  offset 72  ramp             [u32; 4]   loc 8  (base, len, _, _)
///  offset 88  _pad             [f32; 2]
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
    grad_p0: [f32; 2],
    grad_p1: [f32; 2],
    border_color: [f32; 4],
    border_width_pad: [f32; 2],
    ramp: [u32; 4],
    _pad: [f32; 2],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4, // color
        4 => Float32x2, // grad_p0
        5 => Float32x2, // grad_p1
        6 => Float32x4, // border_color
        7 => Float32x2, // border_width_pad
        8 => Uint32x4   // ramp
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::paint::LinearGradient;
    use crate::scene::{Border, ZIndex};

    #[test]
    fn instance_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<RectInstance>(), 96);
    }

    #[test]
    fn multi_stop_gradient_gets_its_own_ramp() {
        let mut g = LinearGradient::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        g.set_color_at(0.0, Color::WHITE);
        g.set_color_at(0.5, Color::CYAN);
        g.set_color_at(1.0, Color::BLACK);

        let mut dl = DrawList::new();
        dl.push_solid_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK);
        dl.push_rect(
            ZIndex::new(1),
            Rect::new(0.0, 0.0, 10.0, 5.0),
            Paint::LinearGradient(g),
            Some(Border::new(1.0, Color::BLACK)),
        );

        let (instances, ramps) = build_instances(&mut dl);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].ramp[1], 0);
        assert_eq!(instances[1].ramp, [0, RAMP_LEN as u32, 0, 0]);
        assert_eq!(instances[1].border_width_pad[0], 1.0);
        assert_eq!(ramps.len(), RAMP_LEN);
        assert_eq!(ramps[0], Color::WHITE.to_array());
        assert_eq!(ramps[RAMP_LEN - 1], Color::BLACK.to_array());
    }

    #[test]
    fn single_stop_gradient_is_drawn_solid() {
        let mut g = LinearGradient::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        g.set_color_at(0.3, Color::CYAN);

        let mut dl = DrawList::new();
        dl.push_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 10.0, 5.0), Paint::LinearGradient(g), None);

        let (instances, ramps) = build_instances(&mut dl);
        assert!(ramps.is_empty());
        assert_eq!(instances[0].color, Color::CYAN.to_array());
    }
}
