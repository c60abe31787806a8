//! WAV encoding for 16-bit stereo PCM.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use bl_engine::Frame;
use hound::{SampleFormat, WavSpec, WavWriter};

fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

pub fn write_wav<W: Write + Seek>(w: W, frames: &[Frame], sample_rate: u32) -> hound::Result<()> {
    let mut writer = WavWriter::new(w, wav_spec(sample_rate))?;
    for frame in frames {
        let (left, right) = frame.to_i16();
        writer.write_sample(left)?;
        writer.write_sample(right)?;
    }
    writer.finalize()
}

pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> hound::Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    write_wav(&mut buf, frames, sample_rate)?;
    Ok(buf.into_inner())
}

pub fn save_wav(path: impl AsRef<Path>, frames: &[Frame], sample_rate: u32) -> hound::Result<()> {
    write_wav(BufWriter::new(File::create(path)?), frames, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_samples_read_back() {
        let frames = [Frame::mono(0.5), Frame { left: -1.0, right: 2.0 }, Frame::silence()];
        let bytes = frames_to_wav(&frames, 44100).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(bytes.len(), 44 + frames.len() * 4);

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec(), wav_spec(44100));
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![16383, 16383, -32767, 32767, 0, 0]);
    }

    #[test]
    fn saved_file_matches_in_memory_encoding() {
        let frames = [Frame::mono(0.25); 32];
        let path = std::env::temp_dir().join(format!("beatlab-wav-{}.wav", std::process::id()));
        save_wav(&path, &frames, 22050).unwrap();
        let on_disk = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(on_disk, frames_to_wav(&frames, 22050).unwrap());
    }
}
