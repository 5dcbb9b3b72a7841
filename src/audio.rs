use anyhow::{anyhow, Context, Result};
use rodio::{OutputStream, Sink};

use crate::model::chord::ChordEvent;

pub mod synth;
pub mod timing;

use synth::ChordTone;

/// Plays `chords` in order on the default output device and blocks until done.
pub fn play(chords: &[ChordEvent], bpm: u32) -> Result<()> {
    if chords.is_empty() {
        return Err(anyhow!("nothing to play"));
    }
    let (_stream, stream_handle) = OutputStream::try_default().context("opening audio output")?;
    let sink = Sink::try_new(&stream_handle).context("creating audio sink")?;
    for chord in chords {
        sink.append(ChordTone::new(chord, bpm));
    }
    crate::console::info(format!("playing {} chords at {} bpm", chords.len(), bpm));
    sink.sleep_until_end();
    Ok(())
}
