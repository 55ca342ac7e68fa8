//! Fixed-size grid of movers with one audio voice per row.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::mover::Mover;
use super::voice_map::VoiceMapping;
use crate::audio::{VoiceFactory, VoiceHandle};
use crate::noise::NoiseSource;
use crate::params::{midi_to_hz, GridParams, MoverParams, Timbre};
use crate::scene::SceneSurface;

/// Grid of movers stored row-major, `rows * cols` long
///
/// Row and column counts are fixed at construction. Each row drives exactly
/// one voice from its first mover.
pub struct MoverGrid<V, N> {
    rows: usize,
    cols: usize,
    movers: Vec<Mover<N>>,
    /// Scene handle for each mover, same layout as `movers`
    visuals: Vec<usize>,
    voices: Vec<V>,
    mapping: VoiceMapping,
}

impl<V: VoiceHandle, N: NoiseSource> MoverGrid<V, N> {
    /// Build the grid, start one voice per row and spawn one box per mover
    ///
    /// `noise_for` is called once per mover with its `(row, col)`. Grid and
    /// mapping parameters are validated before any voice or box is created.
    pub fn new<F, S>(
        grid: &GridParams,
        mover: &MoverParams,
        timbre: &Timbre,
        mapping: VoiceMapping,
        factory: &mut F,
        scene: &mut S,
        mut noise_for: impl FnMut(usize, usize) -> N,
    ) -> Result<Self, String>
    where
        F: VoiceFactory<Voice = V>,
        S: SceneSurface,
    {
        grid.validate()?;
        mapping.params().validate()?;

        let mut rng = StdRng::seed_from_u64(grid.seed);
        let mut movers = Vec::with_capacity(grid.rows * grid.cols);
        let mut visuals = Vec::with_capacity(grid.rows * grid.cols);
        let mut voices = Vec::with_capacity(grid.rows);

        let half_rows = grid.rows as f64 / 2.0;
        let half_cols = grid.cols as f64 / 2.0;

        for row in 0..grid.rows {
            let pitch = grid.row_pitch(row);
            // Slight random detune adds thickness across voices
            let detune = if grid.detune_max_hz > 0.0 {
                rng.gen_range(0.0..grid.detune_max_hz)
            } else {
                0.0
            };
            let frequency_hz = midi_to_hz(pitch) + detune;

            let mut voice = factory.create_voice(timbre);
            voice.start(frequency_hz, 0.0, mapping.params().start_fade_s);
            voices.push(voice);

            log::debug!("Row {}: MIDI {} @ {:.2}Hz", row, pitch, frequency_hz);

            for col in 0..grid.cols {
                let x = row as f64 - half_rows;
                let z = col as f64 - half_cols;
                let phase_offset = row as f64 * grid.row_phase_step;
                let m = Mover::new(x, z, phase_offset, mover, noise_for(row, col));

                let color = Vec3::new(
                    rng.gen_range(0..=1u8) as f32,
                    rng.gen_range(0..=1u8) as f32,
                    rng.gen_range(0..=1u8) as f32,
                );
                visuals.push(scene.spawn_box(m.position().as_vec3(), color));
                movers.push(m);
            }
        }

        Ok(Self {
            rows: grid.rows,
            cols: grid.cols,
            movers,
            visuals,
            voices,
            mapping,
        })
    }

    /// Advance one tick
    ///
    /// Each row's volume is taken from its first mover before the row is
    /// advanced, so audio trails the motion by one tick.
    pub fn update(&mut self) {
        for row in 0..self.rows {
            let start = self.index(row, 0);
            let reference = &self.movers[start];
            let (y, amp_y) = (reference.position().y, reference.amplitude().y);
            self.mapping.apply(&mut self.voices[row], y, amp_y);

            for mover in &mut self.movers[start..start + self.cols] {
                mover.update();
            }
        }
    }

    /// Push every mover position to its scene box
    pub fn display<S: SceneSurface>(&self, scene: &mut S) {
        for (mover, &id) in self.movers.iter().zip(&self.visuals) {
            scene.set_position(id, mover.position().as_vec3());
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Mover at `(row, col)`, `None` outside the grid
    pub fn mover(&self, row: usize, col: usize) -> Option<&Mover<N>> {
        if row < self.rows && col < self.cols {
            self.movers.get(self.index(row, col))
        } else {
            None
        }
    }

    /// Voice driven by `row`
    pub fn voice(&self, row: usize) -> Option<&V> {
        self.voices.get(row)
    }

    /// Positions of all movers in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.movers.iter().map(|m| m.position().as_vec3())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{ConstantNoise, PerlinNoise};
    use crate::params::{VoiceMappingParams, SILENCE_DB};
    use crate::scene::HeadlessScene;

    #[derive(Debug, Default)]
    struct FakeVoice {
        frequency_hz: Option<f32>,
        volumes: Vec<f32>,
    }

    impl VoiceHandle for FakeVoice {
        fn start(&mut self, frequency_hz: f32, _start_time_s: f32, _fade_time_s: f32) {
            self.frequency_hz = Some(frequency_hz);
        }

        fn set_volume_smoothed(&mut self, db: f32, _ramp_time_s: f32) {
            self.volumes.push(db);
        }
    }

    #[derive(Default)]
    struct FakeFactory {
        created: usize,
    }

    impl VoiceFactory for FakeFactory {
        type Voice = FakeVoice;

        fn create_voice(&mut self, _timbre: &Timbre) -> FakeVoice {
            self.created += 1;
            FakeVoice::default()
        }
    }

    fn grid_params(rows: usize, cols: usize) -> GridParams {
        GridParams {
            rows,
            cols,
            detune_max_hz: 0.0,
            ..GridParams::default()
        }
    }

    fn build<N: NoiseSource>(
        params: &GridParams,
        scene: &mut HeadlessScene,
        noise_for: impl FnMut(usize, usize) -> N,
    ) -> (MoverGrid<FakeVoice, N>, FakeFactory) {
        let mut factory = FakeFactory::default();
        let grid = MoverGrid::new(
            params,
            &MoverParams::default(),
            &Timbre::default(),
            VoiceMapping::default(),
            &mut factory,
            scene,
            noise_for,
        )
        .unwrap();
        (grid, factory)
    }

    #[test]
    fn test_grid_creation() {
        let mut scene = HeadlessScene::new();
        let (grid, factory) = build(&grid_params(4, 3), &mut scene, |_, _| ConstantNoise(0.0));

        assert_eq!(factory.created, 4);
        assert_eq!(scene.positions().len(), 12);
        assert_eq!(grid.positions().count(), 12);
        assert!(grid.mover(4, 0).is_none());
        assert!(grid.mover(0, 3).is_none());
    }

    #[test]
    fn test_invalid_params_build_nothing() {
        let mut scene = HeadlessScene::new();
        let mut factory = FakeFactory::default();
        let mut params = grid_params(2, 2);
        params.scale.clear();

        let result: Result<MoverGrid<FakeVoice, ConstantNoise>, String> = MoverGrid::new(
            &params,
            &MoverParams::default(),
            &Timbre::default(),
            VoiceMapping::default(),
            &mut factory,
            &mut scene,
            |_, _| ConstantNoise(0.0),
        );
        assert!(result.is_err());

        let inverted = VoiceMapping::new(VoiceMappingParams {
            gain_range: (3.0, 0.0),
            ..VoiceMappingParams::default()
        });
        let result: Result<MoverGrid<FakeVoice, ConstantNoise>, String> = MoverGrid::new(
            &grid_params(2, 2),
            &MoverParams::default(),
            &Timbre::default(),
            inverted,
            &mut factory,
            &mut scene,
            |_, _| ConstantNoise(0.0),
        );
        assert!(result.is_err());

        assert_eq!(factory.created, 0);
        assert!(scene.positions().is_empty());
    }

    #[test]
    fn test_grid_is_centred() {
        let mut scene = HeadlessScene::new();
        let (grid, _) = build(&grid_params(36, 18), &mut scene, |_, _| ConstantNoise(0.0));

        let first = grid.mover(0, 0).map(|m| m.position());
        let last = grid.mover(35, 17).map(|m| m.position());
        assert_eq!(first.map(|p| (p.x, p.z)), Some((-18.0, -9.0)));
        assert_eq!(last.map(|p| (p.x, p.z)), Some((17.0, 8.0)));
    }

    #[test]
    fn test_rows_get_phase_offsets() {
        let mut scene = HeadlessScene::new();
        let (grid, _) = build(&grid_params(3, 2), &mut scene, |_, _| ConstantNoise(0.0));

        for row in 0..3 {
            let phase = grid.mover(row, 1).map(|m| m.phase().y);
            assert_eq!(phase, Some(row as f64 * 0.25));
        }
    }

    #[test]
    fn test_voices_start_at_scale_pitches() {
        let mut scene = HeadlessScene::new();
        let (grid, _) = build(&grid_params(13, 1), &mut scene, |_, _| ConstantNoise(0.0));

        let freq = |row| grid.voice(row).and_then(|v| v.frequency_hz);
        assert!((freq(0).unwrap() - midi_to_hz(36.0)).abs() < 1e-3);
        assert!((freq(1).unwrap() - midi_to_hz(40.0)).abs() < 1e-3);
        assert!((freq(12).unwrap() - midi_to_hz(55.0)).abs() < 1e-3);
    }

    #[test]
    fn test_detune_stays_within_bound() {
        let params = GridParams {
            rows: 20,
            cols: 1,
            detune_max_hz: 1.0,
            seed: 9,
            ..GridParams::default()
        };
        let mut scene = HeadlessScene::new();
        let (grid, _) = build(&params, &mut scene, |_, _| ConstantNoise(0.0));

        for row in 0..20 {
            let base = midi_to_hz(params.row_pitch(row));
            let freq = grid.voice(row).and_then(|v| v.frequency_hz).unwrap();
            assert!(freq >= base && freq < base + 1.0 + 1e-3);
        }
    }

    #[test]
    fn test_single_mover_scenario() {
        let mut scene = HeadlessScene::new();
        let params = GridParams {
            rows: 1,
            cols: 1,
            detune_max_hz: 0.0,
            ..GridParams::default()
        };
        let (mut grid, _) = build(&params, &mut scene, |_, _| ConstantNoise(0.0));

        // 1 row / 1 col centres the mover at -0.5
        let mover = grid.mover(0, 0).unwrap();
        assert_eq!(mover.phase().y, 0.0);

        grid.update();

        let mover = grid.mover(0, 0).unwrap();
        assert!((mover.phase().y - 0.02).abs() < 1e-12);
        assert!((mover.position().y - 0.02f64.sin() * 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_volume_uses_position_before_update() {
        let mut scene = HeadlessScene::new();
        let (mut grid, _) = build(&grid_params(2, 2), &mut scene, |_, _| ConstantNoise(0.0));

        // First tick reads y = 0: remaps to ~-0.82, clamps to 0, silence
        grid.update();
        assert_eq!(grid.voice(0).unwrap().volumes, vec![SILENCE_DB]);

        let y = grid.mover(0, 0).unwrap().position().y;
        let expected = VoiceMapping::default().map_to_control(y, 2.5);

        grid.update();
        assert_eq!(grid.voice(0).unwrap().volumes[1], expected);
    }

    #[test]
    fn test_volume_comes_from_first_column_only() {
        let mut scene = HeadlessScene::new();
        // Column 0 sits at the noise ceiling, other columns at the floor
        let (mut grid, _) = build(&grid_params(1, 4), &mut scene, |_, col| {
            ConstantNoise(if col == 0 { 1.0 } else { -1.0 })
        });

        grid.update();
        grid.update();

        let expected = VoiceMapping::default()
            .map_to_control(grid.mover(0, 0).unwrap().position().y, 2.5);
        let volumes = &grid.voice(0).unwrap().volumes;
        assert!(volumes[1] > SILENCE_DB);
        assert!(volumes[1] > expected - 1.0);
    }

    #[test]
    fn test_every_row_gets_one_volume_per_tick() {
        let mut scene = HeadlessScene::new();
        let (mut grid, _) = build(&grid_params(5, 3), &mut scene, |r, c| {
            PerlinNoise::new((r * 3 + c) as u32)
        });

        for _ in 0..7 {
            grid.update();
        }

        for row in 0..5 {
            let volumes = &grid.voice(row).unwrap().volumes;
            assert_eq!(volumes.len(), 7);
            assert!(volumes.iter().all(|db| db.is_finite()));
        }
    }

    #[test]
    fn test_display_pushes_positions() {
        let mut scene = HeadlessScene::new();
        let (mut grid, _) = build(&grid_params(3, 3), &mut scene, |r, c| {
            PerlinNoise::new((r * 3 + c) as u32)
        });

        grid.update();
        grid.display(&mut scene);

        let expected: Vec<Vec3> = grid.positions().collect();
        assert_eq!(scene.positions(), expected.as_slice());
    }

    #[test]
    fn test_display_is_idempotent() {
        let mut scene = HeadlessScene::new();
        let (mut grid, _) = build(&grid_params(3, 4), &mut scene, |r, c| {
            PerlinNoise::new((r * 4 + c) as u32)
        });

        grid.update();
        grid.display(&mut scene);
        let first = scene.positions().to_vec();
        grid.display(&mut scene);

        assert_eq!(scene.positions(), first.as_slice());
    }

    #[test]
    fn test_x_and_z_fixed_across_grid_updates() {
        let mut scene = HeadlessScene::new();
        let (mut grid, _) = build(&grid_params(4, 4), &mut scene, |r, c| {
            PerlinNoise::new((r * 4 + c) as u32)
        });
        let before: Vec<(f32, f32)> = grid.positions().map(|p| (p.x, p.z)).collect();

        for _ in 0..500 {
            grid.update();
        }

        let after: Vec<(f32, f32)> = grid.positions().map(|p| (p.x, p.z)).collect();
        assert_eq!(before, after);
    }
}
