//! Hands the projected layout to rapier and runs the game rules on top of it.

use crate::layout::{Layout, Rect};
use rapier2d::dynamics::{IntegrationParameters, RigidBodySet};
use rapier2d::geometry::{BroadPhase, NarrowPhase};
use rapier2d::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    fn delta(self) -> (f32, f32) {
        match self {
            Heading::Up => (0.0, -1.0),
            Heading::Down => (0.0, 1.0),
            Heading::Left => (-1.0, 0.0),
            Heading::Right => (1.0, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Border,
    Wall,
    Goal,
    Ball,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extent {
    Cuboid { half_width: f32, half_height: f32 },
    Ball { radius: f32 },
}

#[derive(Clone, Copy, Debug)]
pub struct BodyView {
    pub kind: BodyKind,
    pub position: Isometry<Real>,
    pub extent: Extent,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldParams {
    pub nudge_speed: f32,
    pub win_gravity: f32,
    pub dt: f32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            nudge_speed: 120.0,
            win_gravity: 900.0,
            dt: 1.0 / 60.0,
        }
    }
}

struct Piece {
    kind: BodyKind,
    handle: RigidBodyHandle,
    extent: Extent,
}

pub struct MazeWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    pieces: Vec<Piece>,
    ball: RigidBodyHandle,
    ball_collider: ColliderHandle,
    goal_collider: ColliderHandle,
    params: WorldParams,
    won: bool,
}

impl MazeWorld {
    pub fn new(layout: &Layout, params: WorldParams) -> Self {
        let mut rigid_body_set = RigidBodySet::new();
        let mut collider_set = ColliderSet::new();
        let mut pieces = Vec::new();

        let mut add_fixed = |rect: &Rect, kind: BodyKind, sensor: bool| {
            let body = RigidBodyBuilder::fixed()
                .translation(vector![rect.x, rect.y])
                .build();
            let handle = rigid_body_set.insert(body);
            let half_width = rect.width / 2.0;
            let half_height = rect.height / 2.0;
            let collider = ColliderBuilder::cuboid(half_width, half_height)
                .sensor(sensor)
                .build();
            let collider_handle =
                collider_set.insert_with_parent(collider, handle, &mut rigid_body_set);
            pieces.push(Piece {
                kind,
                handle,
                extent: Extent::Cuboid {
                    half_width,
                    half_height,
                },
            });
            collider_handle
        };

        for border in &layout.borders {
            add_fixed(border, BodyKind::Border, false);
        }
        for wall in &layout.walls {
            add_fixed(wall, BodyKind::Wall, false);
        }
        let goal_collider = add_fixed(&layout.goal, BodyKind::Goal, true);

        let ball_body = RigidBodyBuilder::dynamic()
            .translation(vector![layout.ball.x, layout.ball.y])
            .linear_damping(0.6)
            .ccd_enabled(true)
            .build();
        let ball = rigid_body_set.insert(ball_body);
        let collider = ColliderBuilder::ball(layout.ball.radius)
            .restitution(0.3)
            .friction(0.1)
            .build();
        let ball_collider = collider_set.insert_with_parent(collider, ball, &mut rigid_body_set);
        pieces.push(Piece {
            kind: BodyKind::Ball,
            handle: ball,
            extent: Extent::Ball {
                radius: layout.ball.radius,
            },
        });

        let integration_parameters = IntegrationParameters {
            dt: params.dt,
            ..IntegrationParameters::default()
        };

        Self {
            gravity: vector![0.0, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),

            rigid_body_set,
            collider_set,

            pieces,
            ball,
            ball_collider,
            goal_collider,
            params,
            won: false,
        }
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn ball_position(&self) -> Vector<Real> {
        self.rigid_body_set[self.ball].position().translation.vector
    }

    pub fn ball_velocity(&self) -> Vector<Real> {
        *self.rigid_body_set[self.ball].linvel()
    }

    /// Adds one nudge of speed to the ball. Has no effect after the win.
    pub fn nudge(&mut self, heading: Heading) {
        if self.won {
            return;
        }
        let (dx, dy) = heading.delta();
        let speed = self.params.nudge_speed;
        if let Some(body) = self.rigid_body_set.get_mut(self.ball) {
            let linvel = *body.linvel() + vector![dx * speed, dy * speed];
            body.set_linvel(linvel, true);
        }
    }

    /// Advances the simulation one timestep. Returns true on the step where
    /// the ball first touches the goal.
    pub fn step(&mut self) -> bool {
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
            None,
            &(),
            &(),
        );

        if self.won {
            return false;
        }
        let touching = self
            .narrow_phase
            .intersection_pair(self.ball_collider, self.goal_collider)
            == Some(true);
        if touching {
            self.collapse();
        }
        touching
    }

    /// Releases every maze wall and turns gravity on. Borders stay put.
    fn collapse(&mut self) {
        self.won = true;
        self.gravity = vector![0.0, self.params.win_gravity];
        for piece in self.pieces.iter().filter(|p| p.kind == BodyKind::Wall) {
            if let Some(body) = self.rigid_body_set.get_mut(piece.handle) {
                body.set_body_type(RigidBodyType::Dynamic, true);
                body.recompute_mass_properties_from_colliders(&self.collider_set);
            }
        }
    }

    pub fn bodies(&self) -> Vec<BodyView> {
        self.pieces
            .iter()
            .filter_map(|piece| {
                let body = self.rigid_body_set.get(piece.handle)?;
                Some(BodyView {
                    kind: piece.kind,
                    position: *body.position(),
                    extent: piece.extent,
                })
            })
            .collect()
    }
}
