use island_scene::{config::SceneConfig, flow, scene::KitchenScene};

fn main() -> anyhow::Result<()> {
    let config = SceneConfig::from_env();
    let scene = KitchenScene::constructor(config.assets_dir.clone());
    flow::run(config, vec![scene])
}
