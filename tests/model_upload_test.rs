//! GPU smoke test: requires a working adapter, so it only runs with
//! `--features integration-tests`.

#![cfg(feature = "integration-tests")]

use vitrine::data_structures::model::ModelKind;

async fn headless_device() -> (wgpu::Device, wgpu::Queue) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .expect("no adapter available");
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .expect("no device available")
}

#[tokio::test]
async fn ground_plane_uploads_to_gpu_buffers() {
    let (device, queue) = headless_device().await;

    let model = vitrine::data_structures::model::Model::load(ModelKind::Ground, &device, &queue)
        .await
        .expect("ground plane generation cannot fail");

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.materials.len(), 1);
    let mesh = &model.meshes[0];
    assert!(mesh.num_elements > 0);
    assert_eq!(mesh.num_elements % 3, 0);
    assert!(mesh.vertex_buffer.size() > 0);
    assert!(mesh.index_buffer.size() as u32 >= mesh.num_elements * 4);
}

#[tokio::test]
async fn obj_models_load_with_materials() {
    let (device, queue) = headless_device().await;

    for kind in [ModelKind::LowPolyHouse, ModelKind::Pancakes, ModelKind::TvRetro] {
        let model = vitrine::data_structures::model::Model::load(kind, &device, &queue)
            .await
            .unwrap_or_else(|e| panic!("loading '{}' failed: {}", kind, e));
        assert!(!model.meshes.is_empty(), "'{}' has no meshes", kind);
        assert!(!model.materials.is_empty(), "'{}' has no materials", kind);
        for mesh in &model.meshes {
            assert!(mesh.material < model.materials.len());
        }
    }
}
