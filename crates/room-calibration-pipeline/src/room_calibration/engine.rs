//! Room-to-camera calibration engine.

use anyhow::Result;
use nalgebra::Translation3;
use room_calibration_core::{
    BodyId, BodyTargetId, Iso3, OneEuroFilter, Quat, Real, TimeValue, Vec3, duration,
    iso_from_position_orientation,
};

use super::config::RoomCalibrationConfig;
use super::guidance::{GuidanceEvent, InstructionState};

/// Estimates the pose of the tracking camera in room space.
///
/// The IMU of one body reports that body's orientation in room space; the
/// camera reports the pose of a target on the same body in camera space.
/// Chaining the two gives the camera in room space:
///
/// `room_se3_camera = room_se3_target * (camera_se3_target)^-1`
///
/// where `room_se3_target` carries only the IMU rotation. Each estimate is
/// smoothed by one-euro filters, and the run finishes after enough
/// consecutive samples in which the smoothed estimate barely moves.
///
/// The engine is driven from a single tracking loop: all mutating methods
/// take `&mut self` and never block.
#[derive(Debug, Clone)]
pub struct RoomCalibration {
    config: RoomCalibrationConfig,
    last_timestamp: TimeValue,
    reports: usize,
    instruction_state: InstructionState,
    position_filter: OneEuroFilter<Vec3>,
    orientation_filter: OneEuroFilter<Quat>,
    video_target: Option<BodyTargetId>,
    imu_body: Option<BodyId>,
    imu_orientation: Option<Quat>,
    last_imu_timestamp: Option<TimeValue>,
}

impl Default for RoomCalibration {
    fn default() -> Self {
        Self::build(RoomCalibrationConfig::default(), TimeValue::now())
    }
}

impl RoomCalibration {
    /// Create an engine whose first video sample is timed against now.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: RoomCalibrationConfig) -> Result<Self> {
        Self::with_start_time(config, TimeValue::now())
    }

    /// Create an engine whose first video sample is timed against `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn with_start_time(config: RoomCalibrationConfig, start: TimeValue) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, start))
    }

    fn build(config: RoomCalibrationConfig, start: TimeValue) -> Self {
        Self {
            last_timestamp: start,
            reports: 0,
            instruction_state: InstructionState::default(),
            position_filter: OneEuroFilter::new(config.position_filter),
            orientation_filter: OneEuroFilter::new(config.orientation_filter),
            video_target: None,
            imu_body: config.imu_body,
            imu_orientation: None,
            last_imu_timestamp: None,
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sample intake
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether a video sample from `target` would be used.
    ///
    /// Nothing is wanted before IMU data arrives. The first video sample must
    /// come from the IMU body; after that only the exact target that supplied
    /// it is accepted for the rest of the run.
    pub fn want_video_data(&self, target: &BodyTargetId) -> bool {
        if !self.have_imu_data() {
            return false;
        }
        match &self.video_target {
            None => self.imu_body == Some(target.body),
            Some(accepted) => accepted == target,
        }
    }

    /// Feed a camera-space pose of `target` observed at `timestamp`.
    ///
    /// Samples that [`want_video_data`](Self::want_video_data) rejects are
    /// ignored entirely. Returns the guidance produced by this sample.
    ///
    /// A timestamp that does not advance past the previous one is processed
    /// with `config.fallback_dt` as its time step.
    pub fn process_video_data(
        &mut self,
        target: &BodyTargetId,
        timestamp: &TimeValue,
        translation: &Vec3,
        orientation: &Quat,
    ) -> Vec<GuidanceEvent> {
        if !self.want_video_data(target) {
            return Vec::new();
        }
        if self.video_target.is_none() {
            log::info!("room calibration locked to video source {target}");
        }
        self.video_target = Some(*target);

        let mut dt = duration(timestamp, &self.last_timestamp);
        self.last_timestamp = *timestamp;
        if dt <= 0.0 {
            log::debug!(
                "non-increasing video timestamp (dt = {dt}), using {} s",
                self.config.fallback_dt
            );
            dt = self.config.fallback_dt;
        }

        let camera_se3_target = iso_from_position_orientation(translation, orientation);
        let room_se3_target = Iso3::from_parts(Translation3::identity(), self.imu_orientation());
        let room_se3_camera = room_se3_target * camera_se3_target.inverse();

        self.position_filter.filter(dt, room_se3_camera.translation.vector);
        self.orientation_filter.filter(dt, room_se3_camera.rotation);

        let linear_speed = self.position_filter.derivative_magnitude();
        let angular_speed = self.orientation_filter.derivative_magnitude();
        log::trace!(
            "room calibration sample: linear {linear_speed:.6} angular {angular_speed:.3e}"
        );

        let events = if linear_speed < self.config.linear_velocity_cutoff
            && angular_speed < self.config.angular_velocity_cutoff
        {
            self.handle_still_sample()
        } else {
            self.handle_excess_velocity(translation.z)
        };
        log_events(&events);
        events
    }

    /// Feed an IMU orientation of `body` in room space.
    ///
    /// The first body to report becomes the IMU reference unless one was
    /// configured. Reports from other bodies are ignored. Returns whether the
    /// orientation was taken.
    pub fn process_imu_data(
        &mut self,
        body: BodyId,
        timestamp: &TimeValue,
        orientation: &Quat,
    ) -> bool {
        match self.imu_body {
            Some(expected) if expected != body => return false,
            Some(_) => {}
            None => {
                log::info!("room calibration using IMU of {body}");
                self.imu_body = Some(body);
            }
        }
        self.imu_orientation = Some(*orientation);
        self.last_imu_timestamp = Some(*timestamp);
        true
    }

    fn handle_still_sample(&mut self) -> Vec<GuidanceEvent> {
        let mut events = Vec::with_capacity(3);
        if self.reports == 0 {
            events.push(GuidanceEvent::CalibrationStarted);
        }
        self.reports += 1;
        events.push(GuidanceEvent::Progress {
            reports: self.reports,
            required: self.config.required_samples,
        });
        if self.reports == self.config.required_samples {
            events.push(GuidanceEvent::Finished);
        }
        events
    }

    fn handle_excess_velocity(&mut self, depth: Real) -> Vec<GuidanceEvent> {
        let mut events = Vec::new();
        if self.reports > 0 {
            events.push(GuidanceEvent::Interrupted {
                reports: self.reports,
            });
        }
        self.reports = 0;
        if let Some(instruction) = self.instruction_state.advance(
            depth,
            self.config.near_message_cutoff,
            self.config.near_confirm_cutoff(),
        ) {
            events.push(instruction);
        }
        events
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Results
    // ─────────────────────────────────────────────────────────────────────────

    /// True once enough consecutive still samples have been seen.
    pub fn finished(&self) -> bool {
        self.reports >= self.config.required_samples
    }

    /// Current smoothed pose of the camera in room space.
    ///
    /// Always available; only trustworthy once [`finished`](Self::finished)
    /// returns true. Identity before any video sample was accepted.
    pub fn room_to_camera(&self) -> Iso3 {
        iso_from_position_orientation(
            &self.position_filter.state(),
            &self.orientation_filter.state(),
        )
    }

    /// Fraction of the required still samples collected, in `[0, 1]`.
    pub fn progress(&self) -> Real {
        (self.reports as Real / self.config.required_samples as Real).min(1.0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &RoomCalibrationConfig {
        &self.config
    }

    /// Length of the current streak of still samples.
    pub fn reports(&self) -> usize {
        self.reports
    }

    pub fn instruction_state(&self) -> InstructionState {
        self.instruction_state
    }

    /// The video source this run is locked to, once one was accepted.
    pub fn video_target(&self) -> Option<BodyTargetId> {
        self.video_target
    }

    /// The body whose IMU is the room reference, once known.
    pub fn imu_body(&self) -> Option<BodyId> {
        self.imu_body
    }

    pub fn have_imu_data(&self) -> bool {
        self.imu_orientation.is_some()
    }

    pub fn have_video_data(&self) -> bool {
        self.video_target.is_some()
    }

    /// Latest IMU orientation of the reference body (identity before any).
    pub fn imu_orientation(&self) -> Quat {
        self.imu_orientation.unwrap_or_else(Quat::identity)
    }

    pub fn last_imu_timestamp(&self) -> Option<TimeValue> {
        self.last_imu_timestamp
    }

    /// Timestamp of the last accepted video sample (start time before any).
    pub fn last_timestamp(&self) -> TimeValue {
        self.last_timestamp
    }
}

fn log_events(events: &[GuidanceEvent]) {
    for event in events {
        match event {
            GuidanceEvent::Progress { reports, required } => {
                log::debug!("room calibration progress {reports}/{required}");
            }
            GuidanceEvent::Interrupted { .. } => log::debug!("{event}"),
            _ => log::info!("{event}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_calibration_core::TargetId;

    const HMD: BodyId = BodyId(0);

    fn engine() -> RoomCalibration {
        RoomCalibration::with_start_time(RoomCalibrationConfig::default(), TimeValue::new(0, 0))
            .unwrap()
    }

    fn at(step: i64) -> TimeValue {
        TimeValue::new(0, step * 16_000)
    }

    #[test]
    fn nothing_wanted_without_imu() {
        let cal = engine();
        for body in 0..3 {
            for target in 0..3 {
                let id = BodyTargetId::new(BodyId(body), TargetId(target));
                assert!(!cal.want_video_data(&id));
            }
        }
        assert!(!cal.have_imu_data());
        assert_eq!(cal.imu_orientation(), Quat::identity());
    }

    #[test]
    fn first_imu_body_becomes_reference() {
        let mut cal = engine();
        let q = Quat::from_euler_angles(0.0, 0.0, 0.5);
        assert!(cal.process_imu_data(BodyId(2), &at(1), &q));
        assert_eq!(cal.imu_body(), Some(BodyId(2)));

        let other = Quat::from_euler_angles(0.3, 0.0, 0.0);
        assert!(!cal.process_imu_data(BodyId(5), &at(2), &other));
        assert_eq!(cal.imu_orientation(), q);
        assert_eq!(cal.last_imu_timestamp(), Some(at(1)));

        assert!(cal.want_video_data(&BodyTargetId::new(BodyId(2), TargetId(1))));
        assert!(!cal.want_video_data(&BodyTargetId::new(BodyId(5), TargetId(1))));
    }

    #[test]
    fn configured_imu_body_filters_updates() {
        let config = RoomCalibrationConfig {
            imu_body: Some(BodyId(7)),
            ..Default::default()
        };
        let mut cal = RoomCalibration::with_start_time(config, TimeValue::new(0, 0)).unwrap();
        assert!(!cal.process_imu_data(BodyId(1), &at(1), &Quat::identity()));
        assert!(!cal.have_imu_data());
        assert!(cal.process_imu_data(BodyId(7), &at(1), &Quat::identity()));
        assert!(cal.have_imu_data());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RoomCalibrationConfig {
            fallback_dt: 0.0,
            ..Default::default()
        };
        assert!(RoomCalibration::new(config).is_err());
    }

    #[test]
    fn still_streak_emits_start_progress_and_finish() {
        let config = RoomCalibrationConfig {
            required_samples: 3,
            ..Default::default()
        };
        let mut cal = RoomCalibration::with_start_time(config, TimeValue::new(0, 0)).unwrap();
        cal.process_imu_data(HMD, &at(0), &Quat::identity());
        let id = BodyTargetId::new(HMD, TargetId(0));
        let t = Vec3::new(0.0, 0.0, 0.25);

        let first = cal.process_video_data(&id, &at(1), &t, &Quat::identity());
        assert_eq!(
            first,
            vec![
                GuidanceEvent::CalibrationStarted,
                GuidanceEvent::Progress {
                    reports: 1,
                    required: 3
                }
            ]
        );
        let second = cal.process_video_data(&id, &at(2), &t, &Quat::identity());
        assert_eq!(second.len(), 1);
        let third = cal.process_video_data(&id, &at(3), &t, &Quat::identity());
        assert_eq!(third.last(), Some(&GuidanceEvent::Finished));
        assert!(cal.finished());
        assert_eq!(cal.progress(), 1.0);

        // Finishing is announced once.
        let fourth = cal.process_video_data(&id, &at(4), &t, &Quat::identity());
        assert!(!fourth.contains(&GuidanceEvent::Finished));
        assert_eq!(cal.reports(), 4);
    }

    #[test]
    fn repeated_timestamp_uses_fallback_step() {
        let mut cal = engine();
        cal.process_imu_data(HMD, &at(0), &Quat::identity());
        let id = BodyTargetId::new(HMD, TargetId(0));
        let t = Vec3::new(0.01, 0.02, 0.2);

        cal.process_video_data(&id, &at(1), &t, &Quat::identity());
        cal.process_video_data(&id, &at(1), &t, &Quat::identity());
        cal.process_video_data(&id, &at(0), &t, &Quat::identity());

        assert_eq!(cal.reports(), 3);
        assert_eq!(cal.last_timestamp(), at(0));
        let pose = cal.room_to_camera();
        assert!(pose.translation.vector.iter().all(|v| v.is_finite()));
        assert!((pose.translation.vector + t).norm() < 1e-9);
    }

    #[test]
    fn room_to_camera_is_identity_before_data() {
        let cal = engine();
        let pose = cal.room_to_camera();
        assert_eq!(pose.translation.vector, Vec3::zeros());
        assert_eq!(pose.rotation, Quat::identity());
        assert_eq!(cal.progress(), 0.0);
    }
}
