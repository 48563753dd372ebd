/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Background reading and writing of file sequences
//!
//! Each open sequence owns one worker thread. A reader decodes frames
//! ahead of playback into a bounded channel and takes seeks as
//! messages on its command channel. A writer encodes images handed to
//! it in order, one file per frame.
//!
//! Dropping a reader or writer clears its running flag and joins the
//! worker. A decode in flight always completes first.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{
    sync_channel, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError
};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use kino_core::info::{ImageInfo, Speed};
use kino_core::log::{error, info, warn};
use kino_core::options::DecoderOptions;

use crate::codecs::CodecRegistry;
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::sequence::FileSequence;

/// Time base of frame timestamps, ticks per second
///
/// Divisible by every common frame rate, so timestamps stay exact.
pub const FLICKS_PER_SECOND: i64 = 705_600_000;

/// Presentation time of the frame at `index`, in flicks
pub fn timestamp(index: usize, speed: Speed) -> i64 {
    if speed.scale == 0 {
        return 0;
    }
    let ticks = index as i128 * i128::from(speed.duration) * i128::from(FLICKS_PER_SECOND)
        / i128::from(speed.scale);
    ticks as i64
}

/// Settings of sequence readers and writers
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SequenceOptions {
    queue_size:    usize,
    poll_interval: Duration,
    speed:         Option<Speed>,
    decoder:       DecoderOptions
}

impl Default for SequenceOptions {
    fn default() -> Self {
        SequenceOptions {
            queue_size:    4,
            poll_interval: Duration::from_millis(10),
            speed:         None,
            decoder:       DecoderOptions::default()
        }
    }
}

impl SequenceOptions {
    /// Frames decoded ahead, or images waiting to be written
    pub const fn get_queue_size(&self) -> usize {
        self.queue_size
    }
    /// How long a worker waits for work before checking whether it should stop
    pub const fn get_poll_interval(&self) -> Duration {
        self.poll_interval
    }
    /// Speed forced on the sequence, `None` keeps the speed of the first frame
    pub const fn get_speed(&self) -> Option<Speed> {
        self.speed
    }
    pub const fn get_decoder_options(&self) -> DecoderOptions {
        self.decoder
    }
    pub fn set_queue_size(mut self, size: usize) -> Self {
        self.queue_size = size.max(1);
        self
    }
    pub fn set_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
    pub fn set_speed(mut self, speed: Option<Speed>) -> Self {
        self.speed = speed;
        self
    }
    pub fn set_decoder_options(mut self, options: DecoderOptions) -> Self {
        self.decoder = options;
        self
    }
}

/// A decoded frame of a sequence
#[derive(Clone, Debug)]
pub struct SequenceFrame {
    /// Position of the frame in the sequence
    pub index:     usize,
    /// Number of the frame in its file name
    pub frame:     i64,
    /// Presentation time in flicks
    pub timestamp: i64,
    /// `None` if the frame could not be decoded, the error is logged
    pub image:     Option<Arc<Image>>
}

enum Command {
    /// Continue from a position, frames of older epochs are stale
    Seek(usize, u64),
    Stop
}

enum Message {
    Frame(SequenceFrame, u64),
    /// Every frame up to the end was sent
    End(u64)
}

/// Decodes the frames of a sequence ahead of playback
pub struct SequenceReader {
    info:     Option<ImageInfo>,
    info_rx:  Receiver<ImageInfo>,
    frames:   Receiver<Message>,
    commands: SyncSender<Command>,
    epoch:    u64,
    finished: bool,
    running:  Arc<AtomicBool>,
    worker:   Option<JoinHandle<()>>
}

/// The files a reader walks through, in playback order
fn frame_files(path: &Path) -> Result<Vec<(i64, PathBuf)>, ImageErrors> {
    match FileSequence::from_path(path)? {
        Some(sequence) if sequence.len() > 1 || !path.exists() => Ok(sequence
            .frames()
            .iter()
            .map(|&frame| (frame, sequence.file_name(frame)))
            .collect()),
        _ => Ok(vec![(0, path.to_path_buf())])
    }
}

impl SequenceReader {
    /// Start reading the file or sequence at `path`
    ///
    /// Returns once the worker is started, frame information arrives
    /// through [`info`](Self::info).
    pub fn open(
        path: &Path, registry: Arc<CodecRegistry>, options: SequenceOptions
    ) -> Result<SequenceReader, ImageErrors> {
        let files = frame_files(path)?;
        let (info_tx, info_rx) = sync_channel(1);
        let (frames_tx, frames) = sync_channel(options.get_queue_size());
        let (commands, commands_rx) = sync_channel(options.get_queue_size());
        let running = Arc::new(AtomicBool::new(true));

        let worker = ReadWorker {
            files,
            registry,
            options,
            frames: frames_tx,
            commands: commands_rx,
            running: Arc::clone(&running),
            index: 0,
            epoch: 0,
            pending: None
        };
        let name = format!("kino-read {}", path.display());
        let handle = std::thread::Builder::new()
            .name(name)
            .spawn(move || worker.run(info_tx))?;

        Ok(SequenceReader {
            info: None,
            info_rx,
            frames,
            commands,
            epoch: 0,
            finished: false,
            running,
            worker: Some(handle)
        })
    }

    /// Information of the first frame, waiting for the worker to read it
    ///
    /// Falls back to empty information if the first frame cannot be read.
    pub fn info(&mut self) -> &ImageInfo {
        let info_rx = &self.info_rx;
        self.info
            .get_or_insert_with(|| info_rx.recv().unwrap_or_default())
    }

    /// Whether the worker is still alive
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Continue reading from the frame at position `index`
    ///
    /// Frames already queued are dropped.
    pub fn seek(&mut self, index: usize) {
        self.epoch += 1;
        self.finished = false;
        while self.frames.try_recv().is_ok() {}

        if self.commands.send(Command::Seek(index, self.epoch)).is_err() {
            warn!("Seek to {} after the reader stopped", index);
        }
    }

    /// Accept a message of the current epoch
    fn accept(&mut self, message: Message) -> Option<Option<SequenceFrame>> {
        match message {
            Message::Frame(frame, epoch) if epoch == self.epoch => Some(Some(frame)),
            Message::End(epoch) if epoch == self.epoch => {
                self.finished = true;
                Some(None)
            }
            _ => None
        }
    }

    /// The next frame, waiting for it to be decoded
    ///
    /// Returns `None` after the last frame, until the next seek.
    pub fn next_frame(&mut self) -> Option<SequenceFrame> {
        while !self.finished {
            let message = self.frames.recv().ok()?;
            if let Some(frame) = self.accept(message) {
                return frame;
            }
        }
        None
    }

    /// The next frame if one is already decoded
    pub fn try_next_frame(&mut self) -> Option<SequenceFrame> {
        while !self.finished {
            let message = self.frames.try_recv().ok()?;
            if let Some(frame) = self.accept(message) {
                return frame;
            }
        }
        None
    }
}

impl Drop for SequenceReader {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        let _ = self.commands.try_send(Command::Stop);

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Sequence reader panicked");
            }
        }
    }
}

struct ReadWorker {
    files:    Vec<(i64, PathBuf)>,
    registry: Arc<CodecRegistry>,
    options:  SequenceOptions,
    frames:   SyncSender<Message>,
    commands: Receiver<Command>,
    running:  Arc<AtomicBool>,
    index:    usize,
    epoch:    u64,
    /// A message the full queue did not take yet
    pending:  Option<Message>
}

impl ReadWorker {
    fn run(mut self, info_tx: SyncSender<ImageInfo>) {
        let speed = match self.read_info() {
            Ok(info) => {
                let speed = info.sequence.speed;
                let _ = info_tx.send(info);
                speed
            }
            Err(err) => {
                error!("Cannot read {:?}: {:?}", self.files.first(), err);
                self.running.store(false, Ordering::Release);
                let _ = info_tx.send(ImageInfo::default());
                return;
            }
        };
        info!("Reading {} frames", self.files.len());

        while self.running.load(Ordering::Acquire) {
            if !self.drain_commands() {
                break;
            }
            if self.pending.is_none() {
                if self.index > self.files.len() {
                    // end marker sent, nothing to do until a seek
                    if !self.wait_for_command() {
                        break;
                    }
                    continue;
                }
                self.pending = Some(self.next_message(speed));
            }
            let Some(message) = self.pending.take() else {
                continue;
            };
            match self.frames.try_send(message) {
                Ok(()) => {}
                Err(TrySendError::Full(message)) => {
                    self.pending = Some(message);
                    if !self.wait_for_command() {
                        break;
                    }
                }
                Err(TrySendError::Disconnected(_)) => break
            }
        }
        self.running.store(false, Ordering::Release);
        info!("Sequence reader stopped");
    }

    fn read_info(&self) -> Result<ImageInfo, ImageErrors> {
        let (_, first) = self
            .files
            .first()
            .ok_or_else(|| ImageErrors::ReadError("empty sequence".to_string()))?;

        let mut info = self
            .registry
            .read_info(first, self.options.get_decoder_options())?;
        if self.files.len() > 1 {
            info.sequence.frames = self.files.iter().map(|(frame, _)| *frame).collect();
        }
        if let Some(speed) = self.options.get_speed() {
            info.sequence.speed = speed;
        }
        Ok(info)
    }

    /// Decode the frame at the current position, or the end marker
    ///
    /// Moves the position past the end once the marker is produced.
    fn next_message(&mut self, speed: Speed) -> Message {
        let index = self.index;
        let Some((frame, file)) = self.files.get(index) else {
            self.index = self.files.len() + 1;
            return Message::End(self.epoch);
        };
        self.index += 1;

        let image = match self
            .registry
            .read_file(file, self.options.get_decoder_options())
        {
            Ok(image) => Some(Arc::new(image)),
            Err(err) => {
                error!("{}: {:?}", file.display(), err);
                None
            }
        };
        let frame = SequenceFrame {
            index,
            frame: *frame,
            timestamp: timestamp(index, speed),
            image
        };
        Message::Frame(frame, self.epoch)
    }

    /// Apply a command, returns false when the worker should stop
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Seek(index, epoch) => {
                // past the end behaves as the end, the marker goes out next
                self.index = index.min(self.files.len());
                self.epoch = epoch;
                self.pending = None;
                true
            }
            Command::Stop => false
        }
    }

    fn drain_commands(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    if !self.apply(command) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false
            }
        }
    }

    fn wait_for_command(&mut self) -> bool {
        match self.commands.recv_timeout(self.options.get_poll_interval()) {
            Ok(command) => self.apply(command),
            Err(RecvTimeoutError::Timeout) => true,
            Err(RecvTimeoutError::Disconnected) => false
        }
    }
}

/// Encodes images into the files of a sequence
pub struct SequenceWriter {
    images:  Option<SyncSender<Arc<Image>>>,
    running: Arc<AtomicBool>,
    worker:  Option<JoinHandle<Result<usize, ImageErrors>>>
}

impl SequenceWriter {
    /// Start writing a sequence named like `path`
    ///
    /// The number in the file name is the first frame written, a name
    /// without a number is overwritten by every image.
    pub fn create(
        path: &Path, registry: Arc<CodecRegistry>, options: SequenceOptions
    ) -> Result<SequenceWriter, ImageErrors> {
        registry.for_path(path)?;

        let path = path.to_path_buf();
        let sequence = FileSequence::from_pattern(&path);
        let first = sequence
            .as_ref()
            .and_then(|sequence| sequence.frames().first().copied())
            .unwrap_or(0);
        let target = path.clone();
        let file_name = move |frame: i64| match &sequence {
            Some(sequence) => sequence.file_name(frame),
            None => target.clone()
        };
        let (images, images_rx) = sync_channel::<Arc<Image>>(options.get_queue_size());
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let poll = options.get_poll_interval();

        let handle = std::thread::Builder::new()
            .name(format!("kino-write {}", path.display()))
            .spawn(move || {
                let mut frame = first;
                let mut written = 0;
                let mut first_error = None;

                while flag.load(Ordering::Acquire) {
                    match images_rx.recv_timeout(poll) {
                        Ok(image) => {
                            let file = file_name(frame);
                            match registry.write(&file, &image) {
                                Ok(()) => written += 1,
                                Err(err) => {
                                    error!("{}: {:?}", file.display(), err);
                                    first_error.get_or_insert(err);
                                }
                            }
                            frame += 1;
                        }
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => break
                    }
                }
                info!("Wrote {} frames of {}", written, path.display());
                first_error.map_or(Ok(written), Err)
            })?;

        Ok(SequenceWriter {
            images: Some(images),
            running,
            worker: Some(handle)
        })
    }

    /// Queue `image` as the next frame, waiting while the queue is full
    pub fn write(&self, image: Arc<Image>) -> Result<(), ImageErrors> {
        self.images
            .as_ref()
            .and_then(|images| images.send(image).ok())
            .ok_or_else(|| ImageErrors::WriteError("sequence writer stopped".to_string()))
    }

    /// Write every queued image and stop the worker
    ///
    /// # Returns
    /// The number of frames written, or the first error met.
    pub fn finish(mut self) -> Result<usize, ImageErrors> {
        drop(self.images.take());

        match self.worker.take().map(JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(ImageErrors::WriteError("sequence writer panicked".to_string())),
            None => Ok(0)
        }
    }
}

impl Drop for SequenceWriter {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        drop(self.images.take());

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Sequence writer panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    use kino_core::info::Speed;
    use kino_core::pixel::PixelFormat;

    use crate::codecs::CodecRegistry;
    use crate::image::Image;
    use crate::stream::{
        timestamp, SequenceOptions, SequenceReader, SequenceWriter, FLICKS_PER_SECOND
    };

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn frame(value: u8) -> Arc<Image> {
        Arc::new(Image::from_pixels(2, 2, PixelFormat::RGB_U8, vec![value; 12]).unwrap())
    }

    #[test]
    fn timestamps_are_exact() {
        assert_eq!(timestamp(24, Speed::new(24, 1)), FLICKS_PER_SECOND);
        assert_eq!(timestamp(30, Speed::new(30_000, 1001)), FLICKS_PER_SECOND * 1001 / 1000);
        assert_eq!(timestamp(5, Speed::new(0, 1)), 0);
    }

    /// Write frames 10 to 12 of `shot.####.tga` into `dir`
    fn write_shot(dir: &Path, registry: &Arc<CodecRegistry>, options: SequenceOptions) {
        let writer =
            SequenceWriter::create(&dir.join("shot.0010.tga"), registry.clone(), options).unwrap();
        for value in [10, 20, 30] {
            writer.write(frame(value)).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), 3);
        assert!(dir.join("shot.0012.tga").exists());
    }

    #[test]
    fn write_then_read_a_sequence() {
        let dir = scratch("kino-stream-round-trip");
        let registry = Arc::new(CodecRegistry::default());
        let options = SequenceOptions::default().set_queue_size(2);

        write_shot(&dir, &registry, options);

        let mut reader =
            SequenceReader::open(&dir.join("shot.0010.tga"), registry, options).unwrap();
        let info = reader.info().clone();
        assert_eq!(info.sequence.frames, [10, 11, 12]);
        assert_eq!(info.dimensions(), (2, 2));

        let mut seen = Vec::new();
        while let Some(frame) = reader.next_frame() {
            let image = frame.image.unwrap();
            seen.push((frame.frame, image.pixels()[0]));
        }
        assert_eq!(seen, [(10, 10), (11, 20), (12, 30)]);
        assert!(reader.next_frame().is_none());

        reader.seek(2);
        let again = reader.next_frame().unwrap();
        assert_eq!((again.index, again.frame), (2, 12));
        assert_eq!(again.timestamp, timestamp(2, Speed::default()));
        assert!(reader.next_frame().is_none());

        drop(reader);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn seeking_to_or_past_the_end_ends_the_stream() {
        let dir = scratch("kino-stream-seek-end");
        let registry = Arc::new(CodecRegistry::default());
        let options = SequenceOptions::default();
        write_shot(&dir, &registry, options);

        let mut reader =
            SequenceReader::open(&dir.join("shot.0010.tga"), registry, options).unwrap();
        assert_eq!(reader.info().sequence.frames.len(), 3);

        reader.seek(3);
        assert!(reader.next_frame().is_none());

        reader.seek(5);
        assert!(reader.next_frame().is_none());
        assert!(reader.next_frame().is_none());

        // the stream recovers from a seek past the end
        reader.seek(1);
        let frame = reader.next_frame().unwrap();
        assert_eq!((frame.index, frame.frame), (1, 11));
        assert!(reader.is_running());

        drop(reader);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn polling_does_not_wait_for_frames() {
        let dir = scratch("kino-stream-poll");
        let registry = Arc::new(CodecRegistry::default());
        let options = SequenceOptions::default();
        write_shot(&dir, &registry, options);

        let mut reader =
            SequenceReader::open(&dir.join("shot.0010.tga"), registry, options).unwrap();
        reader.info();

        let mut polled = None;
        for _ in 0..500 {
            polled = reader.try_next_frame();
            if polled.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let first = polled.unwrap();
        assert_eq!((first.index, first.frame), (0, 10));

        while reader.next_frame().is_some() {}
        // nothing left after the end marker, returns at once
        assert!(reader.try_next_frame().is_none());
        assert!(reader.is_running());

        drop(reader);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unreadable_first_frame_gives_empty_info() {
        let dir = scratch("kino-stream-missing");
        let registry = Arc::new(CodecRegistry::default());

        let mut reader =
            SequenceReader::open(&dir.join("gone.tga"), registry, SequenceOptions::default())
                .unwrap();
        assert_eq!(reader.info().dimensions(), (0, 0));
        assert!(!reader.is_running());
        assert!(reader.next_frame().is_none());
        assert!(reader.try_next_frame().is_none());

        drop(reader);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
