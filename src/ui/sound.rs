/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All fixed sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_place: Arc<Vec<u8>>,
        sfx_lose: Arc<Vec<u8>>,
        sfx_minor: Arc<Vec<u8>>,
        sfx_major: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_place: Arc::new(make_wav(&gen_place())),
                sfx_lose: Arc::new(make_wav(&gen_lose())),
                sfx_minor: Arc::new(make_wav(&gen_minor())),
                sfx_major: Arc::new(make_wav(&gen_major())),
            })
        }

        fn play_bytes(&self, bytes: Vec<u8>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                if let Ok(src) = rodio::Decoder::new(Cursor::new(bytes)) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            self.play_bytes(buf.as_ref().clone());
        }

        /// Short blip on entering a level; pitch climbs with the tower.
        pub fn play_level_blip(&self, level: usize, total_levels: usize) {
            let ratio = level as f32 / total_levels.max(1) as f32;
            let freq = 300.0 + ratio * 900.0;
            self.play_bytes(make_wav(&gen_blip(freq, 0.05, 0.25)));
        }

        pub fn play_place(&self) { self.play(&self.sfx_place); }
        pub fn play_lose(&self) { self.play(&self.sfx_lose); }
        pub fn play_minor(&self) { self.play(&self.sfx_minor); }
        pub fn play_major(&self) { self.play(&self.sfx_major); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: mono Vec<f32> samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, t: f32) -> f32 {
        (t * freq * 2.0 * std::f32::consts::PI).sin()
    }

    /// Simple sine blip at given frequency and duration
    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                tone(freq, t) * env * volume
            })
            .collect()
    }

    /// Play a sequence of notes back to back, square-ish timbre.
    fn gen_notes(notes: &[f32], note_dur: f32, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = tone(freq, t) * 0.7 + tone(freq * 3.0, t) * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Placement: low thud with a noise edge
    fn gen_place() -> Vec<f32> {
        let duration = 0.08;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(1.5);
                (tone(180.0, ti) * 0.7 + noise * 0.3) * env * 0.35
            })
            .collect()
    }

    /// Loss: sad descending tone
    fn gen_lose() -> Vec<f32> {
        let mut samples = gen_notes(&[440.0, 370.0, 311.0, 261.0], 0.12, 0.3);
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade_len)..total {
            samples[i] *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    /// Minor prize: two-note chime
    fn gen_minor() -> Vec<f32> {
        gen_notes(&[784.0, 1047.0], 0.12, 0.3)
    }

    /// Major prize: victory fanfare with a held top note
    fn gen_major() -> Vec<f32> {
        let mut samples = gen_notes(&[523.0, 659.0, 784.0, 1047.0], 0.1, 0.3);
        samples.extend(gen_blip(1047.0, 0.3, 0.3));
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API (no-op stub without the sound feature)
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_level_blip(&self, _level: usize, _total: usize) {}
    pub fn play_place(&self) {}
    pub fn play_lose(&self) {}
    pub fn play_minor(&self) {}
    pub fn play_major(&self) {}
}

/// Map engine events to sound effects.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::LevelEntered { level, .. } => {
                sfx.play_level_blip(*level, crate::domain::grid::ROWS)
            }
            GameEvent::BlockPlaced { .. } => sfx.play_place(),
            GameEvent::Lost { .. } => sfx.play_lose(),
            GameEvent::MinorPrizeOffer => sfx.play_minor(),
            GameEvent::MajorPrizeWon => sfx.play_major(),
            _ => {}
        }
    }
}
