use bevy::{
    core_pipeline::{
        core_3d::graph::{Core3d, Node3d},
        fullscreen_vertex_shader::fullscreen_shader_vertex_state,
    },
    ecs::query::QueryItem,
    prelude::*,
    render::{
        Render, RenderApp, RenderSet,
        extract_component::{ComponentUniforms, DynamicUniformIndex, ExtractComponentPlugin, UniformComponentPlugin},
        render_graph::{
            NodeRunError, RenderGraphApp, RenderGraphContext, RenderLabel, ViewNode, ViewNodeRunner,
        },
        render_resource::{
            binding_types::{sampler, texture_2d, uniform_buffer},
            *,
        },
        renderer::{RenderContext, RenderDevice},
        view::{ExtractedView, ViewTarget},
    },
    window::PrimaryWindow,
};
use constants::halftone::HalftoneSettings;

const HALFTONE_SHADER_PATH: &str = "shaders/halftone.wgsl";

pub struct HalftonePostProcessPlugin;

impl Plugin for HalftonePostProcessPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ExtractComponentPlugin::<HalftoneSettings>::default(),
            UniformComponentPlugin::<HalftoneSettings>::default(),
        ))
        .add_systems(PostUpdate, sync_halftone_resolution);

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .init_resource::<SpecializedRenderPipelines<HalftonePipeline>>()
            .add_systems(
                Render,
                prepare_halftone_pipelines.in_set(RenderSet::Prepare),
            )
            .add_render_graph_node::<ViewNodeRunner<HalftonePostProcessNode>>(
                Core3d,
                HalftonePostProcessLabel,
            )
            .add_render_graph_edges(
                Core3d,
                (
                    Node3d::Tonemapping,
                    HalftonePostProcessLabel,
                    Node3d::EndMainPassPostProcessing,
                ),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app.init_resource::<HalftonePipeline>();
    }
}

/// Keep the shader's resolution uniform equal to the drawing-buffer size.
pub fn sync_halftone_resolution(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut settings: Query<&mut HalftoneSettings>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = window.physical_size().as_vec2().max(Vec2::ONE);

    for mut halftone in &mut settings {
        if halftone.resolution != size {
            halftone.resolution = size;
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
struct HalftonePostProcessLabel;

/// Bind group layout, sampler and shader shared by every halftone view.
#[derive(Resource)]
struct HalftonePipeline {
    layout: BindGroupLayout,
    sampler: Sampler,
    shader: Handle<Shader>,
}

impl FromWorld for HalftonePipeline {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let layout = render_device.create_bind_group_layout(
            "halftone_bind_group_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (
                    texture_2d(TextureSampleType::Float { filterable: false }),
                    sampler(SamplerBindingType::NonFiltering),
                    uniform_buffer::<HalftoneSettings>(true),
                ),
            ),
        );

        // Cell centres are sampled exactly.
        let sampler = render_device.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            ..default()
        });

        Self {
            layout,
            sampler,
            shader: world.load_asset(HALFTONE_SHADER_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HalftonePipelineKey {
    target_format: TextureFormat,
}

impl SpecializedRenderPipeline for HalftonePipeline {
    type Key = HalftonePipelineKey;

    fn specialize(&self, key: Self::Key) -> RenderPipelineDescriptor {
        RenderPipelineDescriptor {
            label: Some("halftone_pipeline".into()),
            layout: vec![self.layout.clone()],
            vertex: fullscreen_shader_vertex_state(),
            fragment: Some(FragmentState {
                shader: self.shader.clone(),
                shader_defs: vec![],
                entry_point: "fragment".into(),
                targets: vec![Some(ColorTargetState {
                    format: key.target_format,
                    blend: None,
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState::default(),
            depth_stencil: None,
            multisample: MultisampleState::default(),
            push_constant_ranges: vec![],
            zero_initialize_workgroup_memory: false,
        }
    }
}

/// Pipeline specialised for one camera's target format.
#[derive(Component)]
struct ViewHalftonePipeline(CachedRenderPipelineId);

fn prepare_halftone_pipelines(
    mut commands: Commands,
    pipeline_cache: Res<PipelineCache>,
    mut pipelines: ResMut<SpecializedRenderPipelines<HalftonePipeline>>,
    halftone_pipeline: Res<HalftonePipeline>,
    views: Query<(Entity, &ExtractedView), With<HalftoneSettings>>,
) {
    for (entity, view) in &views {
        let target_format = if view.hdr {
            ViewTarget::TEXTURE_FORMAT_HDR
        } else {
            TextureFormat::bevy_default()
        };
        let pipeline_id = pipelines.specialize(
            &pipeline_cache,
            &halftone_pipeline,
            HalftonePipelineKey { target_format },
        );
        commands
            .entity(entity)
            .insert(ViewHalftonePipeline(pipeline_id));
    }
}

#[derive(Default)]
struct HalftonePostProcessNode;

impl ViewNode for HalftonePostProcessNode {
    type ViewQuery = (
        &'static ViewTarget,
        &'static ViewHalftonePipeline,
        &'static DynamicUniformIndex<HalftoneSettings>,
    );

    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        (view_target, view_pipeline, settings_index): QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        // Still compiling on the first frames; the scene shows unfiltered.
        let Some(pipeline) = world
            .resource::<PipelineCache>()
            .get_render_pipeline(view_pipeline.0)
        else {
            return Ok(());
        };
        let Some(settings_binding) = world
            .resource::<ComponentUniforms<HalftoneSettings>>()
            .uniforms()
            .binding()
        else {
            return Ok(());
        };

        let halftone_pipeline = world.resource::<HalftonePipeline>();
        let post_process = view_target.post_process_write();

        let bind_group = render_context.render_device().create_bind_group(
            "halftone_bind_group",
            &halftone_pipeline.layout,
            &BindGroupEntries::sequential((
                post_process.source,
                &halftone_pipeline.sampler,
                settings_binding,
            )),
        );

        let mut render_pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some("halftone_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: post_process.destination,
                resolve_target: None,
                ops: Operations::default(),
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[settings_index.index()]);
        render_pass.draw(0..3, 0..1);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::WindowResolution;
    use constants::halftone::HALFTONE_SETTINGS;

    #[test]
    fn resolution_follows_the_window() {
        let mut app = App::new();
        app.add_systems(Update, sync_halftone_resolution);

        let window = Window {
            resolution: WindowResolution::new(800.0, 600.0),
            ..default()
        };
        app.world_mut().spawn((window, PrimaryWindow));
        let camera = app.world_mut().spawn(HALFTONE_SETTINGS).id();

        app.update();

        let settings = app.world().get::<HalftoneSettings>(camera).unwrap();
        assert_eq!(settings.resolution, Vec2::new(800.0, 600.0));
        assert_eq!(settings.dot_radius, HALFTONE_SETTINGS.dot_radius);
    }
}
