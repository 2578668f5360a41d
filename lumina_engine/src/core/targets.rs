use crate::tracing_targets;

tracing_targets! {
    BVH = "bvh",
    SCENE = "scene",
    MESH = "mesh",
    TEXTURE = "texture",
    LIGHT = "light",
}
