//! Texture sources, keyed by the names the body table refers to.

use helios_engine::AssetManifest;

pub const SOURCES: [(&str, &str); 10] = [
    ("earthDay", "textures/planets/earth/day.jpg"),
    ("earthNight", "textures/planets/earth/night.jpg"),
    ("earthSpecularClouds", "textures/planets/earth/specularClouds.jpg"),
    ("sunLava", "textures/sun/lavatile.jpg"),
    ("sunCloud", "textures/sun/cloud.png"),
    ("mars", "textures/planets/mars/mars_2k.jpg"),
    ("mercury", "textures/planets/mercury/mercury_2k.jpg"),
    ("venusSurface", "textures/planets/venus/venus_surface_2k.jpg"),
    ("jupiter", "textures/planets/jupiter/jupiter_2k.jpg"),
    ("environmentMap", "textures/environment/stars_milky_way_8k.jpg"),
];

pub fn manifest() -> AssetManifest {
    SOURCES
        .iter()
        .fold(AssetManifest::default(), |manifest, (name, path)| manifest.with_texture(*name, *path))
}
