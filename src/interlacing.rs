/// Iterates the non-empty Adam7 reduced images of a `width` x `height`
/// image, in pass order.
pub(crate) struct Adam7Iter {
    current_pass: Option<usize>,
    width: usize,
    height: usize,
}

impl Adam7Iter {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            current_pass: Some(0),
            width,
            height,
        }
    }

    const STARTING_ROW: [usize; 7] = [0, 0, 4, 0, 2, 0, 1];
    const STARTING_COL: [usize; 7] = [0, 4, 0, 2, 0, 1, 0];
    const ROW_INCREMENT: [usize; 7] = [8, 8, 8, 4, 4, 2, 2];
    const COL_INCREMENT: [usize; 7] = [8, 8, 4, 4, 2, 2, 1];
}

impl Iterator for Adam7Iter {
    type Item = SubImage;

    fn next(&mut self) -> Option<Self::Item> {
        let mut pass = self.current_pass?;
        while pass < 7 {
            let pass_width = self
                .width
                .saturating_sub(Self::STARTING_COL[pass])
                .div_ceil(Self::COL_INCREMENT[pass]);
            let pass_height = self
                .height
                .saturating_sub(Self::STARTING_ROW[pass])
                .div_ceil(Self::ROW_INCREMENT[pass]);
            // An empty reduced image contributes nothing, not even filter bytes.
            if pass_width == 0 || pass_height == 0 {
                pass += 1;
                continue;
            }
            self.current_pass = if pass == 6 { None } else { Some(pass + 1) };
            return Some(SubImage {
                width: pass_width,
                height: pass_height,
                x_start: Self::STARTING_COL[pass],
                y_start: Self::STARTING_ROW[pass],
                x_stride: Self::COL_INCREMENT[pass],
                y_stride: Self::ROW_INCREMENT[pass],
            });
        }
        self.current_pass = None;
        None
    }
}

/// One reduced image: its dimensions plus where its pixels sit in the full
/// grid (origin and stride per axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubImage {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) x_start: usize,
    pub(crate) y_start: usize,
    pub(crate) x_stride: usize,
    pub(crate) y_stride: usize,
}
