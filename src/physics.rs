//! Rapier3D-backed implementation of the [`Physics`](crate::player::Physics)
//! contract.
//!
//! The rapier world runs with zero global gravity: the control core owns
//! the gravity vector and applies it as explicit forces, so reorienting
//! "down" never touches the physics world itself.

use std::collections::HashMap;

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use crate::player::{ForceMode, Physics, QueryLayer, SweepHit};

// Collision groups: the player capsule collides with ground geometry
// only; interaction markers are sensors found by overlap queries.
const GROUP_GROUND: Group = Group::GROUP_1;
const GROUP_CHARACTER: Group = Group::GROUP_2;
const GROUP_INTERACT: Group = Group::GROUP_3;

const CAPSULE_HALF_HEIGHT: f32 = 0.6;
const CAPSULE_RADIUS: f32 = 0.3;

/// Wrapper around the Rapier3D world holding one player body plus the
/// static geometry and interaction markers around it.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    player_body: RigidBodyHandle,
    /// Maps interaction marker colliders to their interactable id
    collider_to_interactable: HashMap<ColliderHandle, u64>,
}

impl PhysicsWorld {
    /// Creates a world containing only the player capsule at `spawn`.
    /// Rotation is locked; the control core writes orientation directly.
    pub fn new(spawn: Point3<f32>) -> Self {
        let mut rigid_body_set = RigidBodySet::new();
        let mut collider_set = ColliderSet::new();

        let body = RigidBodyBuilder::dynamic()
            .translation(spawn.coords)
            .lock_rotations()
            .build();
        let player_body = rigid_body_set.insert(body);
        let collider = ColliderBuilder::capsule_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS)
            .collision_groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_GROUND))
            .build();
        collider_set.insert_with_parent(collider, player_body, &mut rigid_body_set);

        let mut world = Self {
            gravity: vector![0.0, 0.0, 0.0],
            rigid_body_set,
            collider_set,
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            player_body,
            collider_to_interactable: HashMap::new(),
        };
        world.refresh_queries();
        world
    }

    /// Adds a fixed cuboid on the ground layer.
    pub fn add_ground_part(&mut self, position: Point3<f32>, half_extents: Vector3<f32>) {
        let body = RigidBodyBuilder::fixed().translation(position.coords).build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(InteractionGroups::new(GROUP_GROUND, Group::ALL))
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.refresh_queries();
    }

    /// Adds a sensor ball on the interaction layer, reported by
    /// overlap queries under `id`.
    pub fn add_interactable_marker(&mut self, id: u64, position: Point3<f32>, radius: f32) {
        let body = RigidBodyBuilder::fixed().translation(position.coords).build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::ball(radius)
            .sensor(true)
            .collision_groups(InteractionGroups::new(GROUP_INTERACT, Group::ALL))
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.collider_to_interactable.insert(collider_handle, id);
        self.refresh_queries();
    }

    fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    fn player(&self) -> &RigidBody {
        &self.rigid_body_set[self.player_body]
    }

    fn player_mut(&mut self) -> &mut RigidBody {
        &mut self.rigid_body_set[self.player_body]
    }

    fn layer_filter(&self, layer: QueryLayer) -> QueryFilter<'_> {
        let filter = QueryFilter::default().exclude_rigid_body(self.player_body);
        match layer {
            QueryLayer::Ground => filter
                .exclude_sensors()
                .groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_GROUND)),
            QueryLayer::Interaction => {
                filter.groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_INTERACT))
            }
        }
    }
}

impl Physics for PhysicsWorld {
    fn position(&self) -> Point3<f32> {
        Point3::from(*self.player().translation())
    }

    fn rotation(&self) -> UnitQuaternion<f32> {
        *self.player().rotation()
    }

    fn velocity(&self) -> Vector3<f32> {
        *self.player().linvel()
    }

    fn set_position(&mut self, position: Point3<f32>) {
        self.player_mut().set_translation(position.coords, true);
    }

    fn set_rotation(&mut self, rotation: UnitQuaternion<f32>) {
        self.player_mut().set_rotation(rotation, true);
    }

    fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.player_mut().set_linvel(velocity, true);
    }

    fn apply_force(&mut self, force: Vector3<f32>, mode: ForceMode) {
        let mass = self.player().mass();
        let body = self.player_mut();
        match mode {
            ForceMode::Force => body.add_force(force, true),
            ForceMode::Acceleration => body.add_force(force * mass, true),
            ForceMode::Impulse => body.apply_impulse(force, true),
            ForceMode::VelocitySet => body.set_linvel(force, true),
        }
    }

    fn sweep_cast(
        &self,
        origin: Point3<f32>,
        radius: f32,
        direction: Unit<Vector3<f32>>,
        max_distance: f32,
        layer: QueryLayer,
    ) -> Option<SweepHit> {
        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(origin.x, origin.y, origin.z);
        let shape_vel = direction.into_inner();
        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            ..Default::default()
        };
        let (_, hit) = self.query_pipeline.cast_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape_vel,
            &shape,
            options,
            self.layer_filter(layer),
        )?;

        // witness1/normal1 sit on the hit collider, in world space
        let mut normal = hit.normal1;
        if normal.dot(&direction).is_sign_positive() {
            normal = -normal;
        }
        Some(SweepHit {
            distance: hit.time_of_impact,
            normal,
            point: hit.witness1,
        })
    }

    fn overlap_sphere(&self, origin: Point3<f32>, radius: f32, layer: QueryLayer) -> Vec<u64> {
        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(origin.x, origin.y, origin.z);
        let mut found = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape,
            self.layer_filter(layer),
            |handle| {
                if let Some(&id) = self.collider_to_interactable.get(&handle) {
                    found.push(id);
                }
                true
            },
        );
        found
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        // forces are per-tick inputs from the states, not persistent
        self.player_mut().reset_forces(true);
    }
}
