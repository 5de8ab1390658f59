use crate::camera::{Camera, OrbitControls, PointerAction};
use crate::core::FrameTiming;
use crate::environment::EnvironmentPreset;
use crate::scene::node::{AmbientLight, DirectionalLight, FrameListener, VisualRef};

/// Composition root for one renderable viewport
///
/// Wires the camera, both light sources, the environment preset and the
/// animated components together. Construction is the mount; dropping the
/// container releases everything it owns.
pub struct SceneContainer {
    pub camera: Camera,
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub environment: EnvironmentPreset,
    orbit: Option<OrbitControls>,
    actors: Vec<Box<dyn FrameListener>>,
}

impl SceneContainer {
    pub fn new(
        camera: Camera,
        ambient: AmbientLight,
        directional: DirectionalLight,
        environment: EnvironmentPreset,
    ) -> Self {
        Self {
            camera,
            ambient,
            directional,
            environment,
            orbit: None,
            actors: Vec::new(),
        }
    }

    pub fn with_actor(mut self, actor: Box<dyn FrameListener>) -> Self {
        self.actors.push(actor);
        self
    }

    pub fn with_orbit(mut self, controls: OrbitControls) -> Self {
        self.orbit = Some(controls);
        self
    }

    /// Animation pass: run every component's frame hook, then settle the
    /// camera from the orbit state
    pub fn advance(&mut self, timing: &FrameTiming) {
        for actor in &mut self.actors {
            actor.on_frame(timing);
        }

        if let Some(orbit) = &self.orbit {
            orbit.apply(&mut self.camera);
        }
    }

    /// Route a pointer action into the orbit controls, if this container
    /// is interactive
    pub fn pointer(&mut self, action: PointerAction) {
        if let Some(orbit) = &mut self.orbit {
            orbit.handle(action);
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.orbit.is_some()
    }

    pub fn orbit(&self) -> Option<&OrbitControls> {
        self.orbit.as_ref()
    }

    pub fn visuals(&self) -> impl Iterator<Item = VisualRef<'_>> {
        self.actors.iter().map(|actor| actor.visual())
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::PointSpriteMaterial;
    use crate::scene::node::PointsVisual;
    use glam::Vec3;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingActor {
        points: PointsVisual,
        calls: Rc<Cell<u32>>,
    }

    impl CountingActor {
        fn new(calls: Rc<Cell<u32>>) -> Self {
            Self {
                points: PointsVisual {
                    positions: vec![0.0; 3],
                    material: PointSpriteMaterial::default(),
                    rotation: Vec3::ZERO,
                },
                calls,
            }
        }
    }

    impl FrameListener for CountingActor {
        fn on_frame(&mut self, _timing: &FrameTiming) {
            self.calls.set(self.calls.get() + 1);
        }

        fn visual(&self) -> VisualRef<'_> {
            VisualRef::Points(&self.points)
        }
    }

    fn bare_container() -> SceneContainer {
        SceneContainer::new(
            Camera::new(Vec3::new(0.0, 0.0, 4.0), 45.0),
            AmbientLight::white(0.6),
            DirectionalLight::white(Vec3::new(3.0, 3.0, 3.0), 1.0),
            EnvironmentPreset::City,
        )
    }

    #[test]
    fn advance_runs_every_actor_once() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut container = bare_container()
            .with_actor(Box::new(CountingActor::new(first.clone())))
            .with_actor(Box::new(CountingActor::new(second.clone())));

        container.advance(&FrameTiming::new(1, 0.016, 0.016));
        container.advance(&FrameTiming::new(2, 0.032, 0.016));

        assert_eq!(first.get(), 2);
        assert_eq!(second.get(), 2);
        assert_eq!(container.actor_count(), 2);
        assert_eq!(container.visuals().count(), 2);
    }

    #[test]
    fn pointer_without_orbit_is_ignored() {
        let mut container = bare_container();
        let before = container.camera.position;

        container.pointer(PointerAction::Drag { dx: 50.0, dy: 50.0 });
        container.advance(&FrameTiming::new(1, 0.016, 0.016));

        assert!(!container.is_interactive());
        assert_eq!(container.camera.position, before);
    }

    #[test]
    fn orbit_drag_settles_into_camera_on_advance() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 7.0), 50.0);
        let controls = OrbitControls::from_camera(&camera)
            .with_zoom(false)
            .with_pan(false);
        let mut container = SceneContainer::new(
            camera,
            AmbientLight::white(0.6),
            DirectionalLight::white(Vec3::new(6.0, 6.0, 6.0), 0.8),
            EnvironmentPreset::City,
        )
        .with_orbit(controls);

        container.pointer(PointerAction::Drag { dx: 200.0, dy: 0.0 });
        container.advance(&FrameTiming::new(1, 0.016, 0.016));

        assert!(container.is_interactive());
        // Eye moved on the orbit sphere, distance preserved
        assert!(container.camera.position != Vec3::new(0.0, 0.0, 7.0));
        assert!((container.camera.position.length() - 7.0).abs() < 1e-3);
    }
}
