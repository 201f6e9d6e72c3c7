//! Shared defended-site definition.
//!
//! A small coastal installation: a fire-control post driving two tracking
//! dishes, a mast-mounted perimeter radar with a steerable search head, and
//! a blast shield that shadows the western dish's view due north.  Every
//! endpoint in the demo builds its world from this one description so
//! entity ids line up everywhere.

use gw_core::{EntityId, Vec3};
use gw_world::{MountDef, ObjectHandle, Sphere, SphereOccluder, WorldModel};

pub const FIRE_CONTROL:    EntityId = EntityId(10);
pub const DISH_EAST:       EntityId = EntityId(11);
pub const DISH_WEST:       EntityId = EntityId(12);
pub const PERIMETER_RADAR: EntityId = EntityId(20);
pub const SEARCH_HEAD:     EntityId = EntityId(21);

/// Build one copy of the site world.
///
/// Called once per endpoint: the server and each client own their world.
pub fn build_site() -> WorldModel {
    let mut world = WorldModel::default();

    world.spawn(ObjectHandle::fixed(FIRE_CONTROL, "fire control post", Vec3::new(0.0, 5.0, 0.0), 6.0));
    world.spawn(ObjectHandle::fixed(DISH_EAST, "east dish", Vec3::new(60.0, 10.0, 0.0), 4.0));
    world.spawn(ObjectHandle::fixed(DISH_WEST, "west dish", Vec3::new(-60.0, 10.0, 0.0), 4.0));
    world.spawn(ObjectHandle::fixed(PERIMETER_RADAR, "perimeter radar", Vec3::new(0.0, 30.0, 0.0), 3.0));
    world.spawn(ObjectHandle::fixed(SEARCH_HEAD, "search head", Vec3::new(0.0, 28.0, 0.0), 2.0));

    // Mounts only matter where aim commands are executed, but clients keep
    // them too so the worlds stay interchangeable.
    for steerable in [DISH_EAST, DISH_WEST, SEARCH_HEAD] {
        world.add_mount(steerable, MountDef::turret()).expect("steerable accepts a turret mount");
    }

    world
}

/// Site structure that can shadow a dish's view out of its own hull.
///
/// The shield sits just north of the west dish, inside its bounding
/// sphere, so northern aims fail the self-occlusion check while eastern
/// and western aims stay clear.
pub fn build_occluders() -> SphereOccluder {
    let mut occluders = SphereOccluder::new();
    // Blast shield beside the west dish.
    occluders.add(Sphere::new(Vec3::new(-60.0, 11.0, 2.5), 1.6));
    occluders
}
