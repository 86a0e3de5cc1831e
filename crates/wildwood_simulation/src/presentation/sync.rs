//! Sync presentation intent → PresentationSink
//!
//! Sink — граница с движком (animator, renderer, audio). В headless режиме
//! по умолчанию пишет в logger.

use bevy::prelude::*;

use super::{AnimationState, AnimationTrigger, AnimationTriggered, FootstepPlayed, SurfaceColor, SurfaceTint};

/// Контракт presentation слоя (animator + renderers + audio source)
pub trait PresentationSink: Send + Sync + 'static {
    fn set_moving(&mut self, entity: Entity, moving: bool);
    fn set_animation_rate(&mut self, entity: Entity, rate: f32);
    fn trigger(&mut self, entity: Entity, trigger: AnimationTrigger);
    fn set_surface_color(&mut self, entity: Entity, color: SurfaceColor);
    fn play_footstep(&mut self, entity: Entity, clip: u32);
}

/// Default sink: всё в logger (debug level)
#[derive(Debug, Default)]
pub struct LogPresentationSink;

impl PresentationSink for LogPresentationSink {
    fn set_moving(&mut self, entity: Entity, moving: bool) {
        crate::log(&format!("[presentation] {:?} moving={}", entity, moving));
    }

    fn set_animation_rate(&mut self, entity: Entity, rate: f32) {
        crate::log(&format!("[presentation] {:?} animation rate {:.2}", entity, rate));
    }

    fn trigger(&mut self, entity: Entity, trigger: AnimationTrigger) {
        crate::log(&format!("[presentation] {:?} trigger {}", entity, trigger.name()));
    }

    fn set_surface_color(&mut self, entity: Entity, color: SurfaceColor) {
        crate::log(&format!(
            "[presentation] {:?} tint ({:.1}, {:.1}, {:.1})",
            entity, color.r, color.g, color.b
        ));
    }

    fn play_footstep(&mut self, entity: Entity, clip: u32) {
        crate::log(&format!("[presentation] {:?} footstep #{}", entity, clip));
    }
}

/// Resource: активный presentation sink
#[derive(Resource)]
pub struct Presentation(Box<dyn PresentationSink>);

impl Presentation {
    pub fn new(sink: impl PresentationSink) -> Self {
        Self(Box::new(sink))
    }

    pub fn sink(&mut self) -> &mut dyn PresentationSink {
        self.0.as_mut()
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new(LogPresentationSink)
    }
}

/// Система: изменения AnimationState/SurfaceTint + события → sink
pub fn sync_presentation(
    animations: Query<(Entity, Ref<AnimationState>)>,
    tints: Query<(Entity, &SurfaceTint), Changed<SurfaceTint>>,
    mut triggers: EventReader<AnimationTriggered>,
    mut footsteps: EventReader<FootstepPlayed>,
    mut presentation: ResMut<Presentation>,
) {
    let sink = presentation.sink();

    for (entity, animation) in animations.iter() {
        if !animation.is_changed() {
            continue;
        }
        sink.set_moving(entity, animation.moving);
        sink.set_animation_rate(entity, animation.speed_scale);
    }

    for event in triggers.read() {
        sink.trigger(event.entity, event.trigger);
    }

    for (entity, tint) in tints.iter() {
        sink.set_surface_color(entity, tint.color);
    }

    for event in footsteps.read() {
        sink.play_footstep(event.entity, event.clip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Moving(bool),
        Rate(f32),
        Trigger(AnimationTrigger),
        Color(SurfaceColor),
        Footstep(u32),
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<Call>>>);

    impl RecordingSink {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl PresentationSink for RecordingSink {
        fn set_moving(&mut self, _entity: Entity, moving: bool) {
            self.0.lock().unwrap().push(Call::Moving(moving));
        }
        fn set_animation_rate(&mut self, _entity: Entity, rate: f32) {
            self.0.lock().unwrap().push(Call::Rate(rate));
        }
        fn trigger(&mut self, _entity: Entity, trigger: AnimationTrigger) {
            self.0.lock().unwrap().push(Call::Trigger(trigger));
        }
        fn set_surface_color(&mut self, _entity: Entity, color: SurfaceColor) {
            self.0.lock().unwrap().push(Call::Color(color));
        }
        fn play_footstep(&mut self, _entity: Entity, clip: u32) {
            self.0.lock().unwrap().push(Call::Footstep(clip));
        }
    }

    fn app_with(sink: RecordingSink) -> App {
        let mut app = App::new();
        app.add_event::<AnimationTriggered>()
            .add_event::<FootstepPlayed>()
            .insert_resource(Presentation::new(sink))
            .add_systems(Update, sync_presentation);
        app
    }

    #[test]
    fn test_changes_forwarded_once() {
        let sink = RecordingSink::default();
        let mut app = app_with(sink.clone());

        let entity = app
            .world_mut()
            .spawn((AnimationState::default(), SurfaceTint::default()))
            .id();

        app.update();
        assert_eq!(
            sink.take(),
            vec![Call::Moving(false), Call::Rate(1.0), Call::Color(SurfaceColor::WHITE)]
        );

        // Без изменений — тишина
        app.update();
        assert!(sink.take().is_empty());

        app.world_mut().get_mut::<AnimationState>(entity).unwrap().moving = true;
        app.update();
        assert_eq!(sink.take(), vec![Call::Moving(true), Call::Rate(1.0)]);
    }

    #[test]
    fn test_events_forwarded() {
        let sink = RecordingSink::default();
        let mut app = app_with(sink.clone());
        let entity = app.world_mut().spawn_empty().id();

        app.world_mut().send_event(AnimationTriggered {
            entity,
            trigger: AnimationTrigger::Attack,
        });
        app.world_mut().send_event(FootstepPlayed { entity, clip: 2 });
        app.update();

        assert_eq!(
            sink.take(),
            vec![Call::Trigger(AnimationTrigger::Attack), Call::Footstep(2)]
        );
    }
}
