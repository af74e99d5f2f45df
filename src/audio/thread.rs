use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::thread::JoinHandle;

use log::{debug, error, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::player::SourceOptions;
use super::sink::{create_sink, fetch_source, verify_decodable};
use super::types::{AudioCmd, AudioEvent, LoadTicket};

/// The resource of the current load.
struct Loaded {
    ticket: LoadTicket,
    bytes: Arc<[u8]>,
    sink: Option<Sink>,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    options: SourceOptions,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // Without an output device loads still succeed; playback is rejected.
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!("no audio output device: {e}");
                None
            }
        };

        let client = match reqwest::blocking::Client::builder()
            .timeout(options.load_timeout)
            .build()
        {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("HTTP client unavailable, remote tracks will fail to load: {e}");
                None
            }
        };

        let mut current: Option<Loaded> = None;
        let mut volume: f32 = 1.0;

        fn drop_current(current: &mut Option<Loaded>) {
            if let Some(loaded) = current.take() {
                if let Some(s) = loaded.sink.as_ref() {
                    s.stop();
                }
            }
        }

        fn load(
            ticket: LoadTicket,
            url: &str,
            options: &SourceOptions,
            client: Option<&reqwest::blocking::Client>,
            stream: Option<&OutputStream>,
            volume: f32,
        ) -> Result<Loaded, String> {
            let bytes =
                fetch_source(url, &options.media_root, client).map_err(|e| e.to_string())?;
            verify_decodable(&bytes).map_err(|e| e.to_string())?;

            let sink = match stream {
                Some(stream) => Some(create_sink(stream, &bytes, volume).map_err(|e| e.to_string())?),
                None => None,
            };
            Ok(Loaded {
                ticket,
                bytes,
                sink,
            })
        }

        while let Ok(cmd) = rx.recv() {
            match cmd {
                AudioCmd::Load { ticket, url } => {
                    drop_current(&mut current);
                    debug!("audio thread loading #{} from {url}", ticket.id());
                    let event = match load(
                        ticket,
                        &url,
                        &options,
                        client.as_ref(),
                        stream.as_ref(),
                        volume,
                    ) {
                        Ok(loaded) => {
                            current = Some(loaded);
                            AudioEvent::Loaded { ticket }
                        }
                        Err(reason) => AudioEvent::LoadFailed { ticket, reason },
                    };
                    if events.send(event).is_err() {
                        break;
                    }
                }

                AudioCmd::Cancel(ticket) => {
                    if current.as_ref().is_some_and(|c| c.ticket == ticket) {
                        drop_current(&mut current);
                    }
                }

                AudioCmd::Play(ticket) => {
                    let rejection = match current.as_ref() {
                        Some(Loaded {
                            ticket: t,
                            sink: Some(s),
                            ..
                        }) if *t == ticket => {
                            s.set_volume(volume);
                            s.play();
                            None
                        }
                        Some(Loaded {
                            ticket: t,
                            sink: None,
                            ..
                        }) if *t == ticket => Some("no audio output device".to_string()),
                        _ => Some("no audio resource is loaded".to_string()),
                    };
                    if let Some(reason) = rejection {
                        if events
                            .send(AudioEvent::PlaybackRejected { ticket, reason })
                            .is_err()
                        {
                            break;
                        }
                    }
                }

                AudioCmd::Pause => {
                    if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                        s.pause();
                    }
                }

                AudioCmd::SeekToStart => {
                    // Rebuild the sink; decoders are not guaranteed to seek backwards.
                    let (Some(stream), Some(loaded)) = (stream.as_ref(), current.as_mut()) else {
                        continue;
                    };
                    let was_playing = loaded.sink.as_ref().is_some_and(|s| !s.is_paused());
                    match create_sink(stream, &loaded.bytes, volume) {
                        Ok(new_sink) => {
                            if let Some(old) = loaded.sink.replace(new_sink) {
                                old.stop();
                            }
                            if was_playing {
                                if let Some(s) = loaded.sink.as_ref() {
                                    s.play();
                                }
                            }
                        }
                        Err(e) => warn!("failed to rewind audio: {e}"),
                    }
                }

                AudioCmd::SetVolume(v) => {
                    volume = v;
                    if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                        s.set_volume(volume);
                    }
                }

                AudioCmd::Release => {
                    drop_current(&mut current);
                }

                AudioCmd::Quit => {
                    drop_current(&mut current);
                    break;
                }
            }
        }
    })
}
