use vid_core::VideoService;

#[derive(Clone)]
pub struct VidAxumState {
    pub videos: VideoService,
}

impl VidAxumState {
    pub fn new(videos: VideoService) -> Self {
        Self { videos }
    }
}
