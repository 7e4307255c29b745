//! 프레임(픽셀 버퍼) 모델.
//!
//! 캡처 결과나 참조 템플릿을 담는 RGBA 2차원 격자.
//! 생성 후 변경하지 않으며, 자르기 등의 변환은 새 버퍼를 만든다.

use crate::error::CoreError;
use crate::models::geometry::BoundingBox;

/// RGBA 채널 수
const CHANNELS: usize = 4;

/// RGBA 픽셀 버퍼 (행 우선, 픽셀당 4바이트)
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// 원시 RGBA 바이트로 버퍼 생성
    ///
    /// 바이트 길이가 `width * height * 4`와 다르면 에러.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(CoreError::Internal(format!(
                "픽셀 버퍼 크기 불일치: {width}x{height} → {expected}바이트 필요, {}바이트 수신",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// 단색 버퍼 생성
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// 좌표별 함수로 버퍼 생성
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// 너비 (픽셀)
    pub fn width(&self) -> u32 {
        self.width
    }

    /// 높이 (픽셀)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// 너비나 높이가 0인지
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 원시 RGBA 바이트
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// 원시 RGBA 바이트 소유권 반환
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// 픽셀 조회 (범위 밖이면 None)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// 픽셀 RGB 조회: 호출자가 범위를 보장하는 핫 루프용
    #[inline]
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// 영역을 잘라 새 버퍼 생성
    ///
    /// 영역은 버퍼 경계로 잘리며, 겹치는 부분이 없으면 에러.
    pub fn crop(&self, region: &BoundingBox) -> Result<PixelBuffer, CoreError> {
        let x0 = region.x.max(0) as u32;
        let y0 = region.y.max(0) as u32;
        let x1 = (region.right().max(0) as u32).min(self.width);
        let y1 = (region.bottom().max(0) as u32).min(self.height);

        if x0 >= x1 || y0 >= y1 {
            return Err(CoreError::Internal(format!(
                "자르기 영역이 버퍼 밖: {:?} (버퍼 {}x{})",
                region, self.width, self.height
            )));
        }

        let (w, h) = (x1 - x0, y1 - y0);
        let row_bytes = w as usize * CHANNELS;
        let mut data = Vec::with_capacity(row_bytes * h as usize);
        for y in y0..y1 {
            let start = (y as usize * self.width as usize + x0 as usize) * CHANNELS;
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }

        Ok(PixelBuffer {
            width: w,
            height: h,
            data,
        })
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn pixel_access() {
        let buf = PixelBuffer::from_fn(4, 3, |x, y| [x as u8, y as u8, 7, 255]);
        assert_eq!(buf.get_pixel(3, 2), Some([3, 2, 7, 255]));
        assert_eq!(buf.rgb_at(1, 2), [1, 2, 7]);
        assert_eq!(buf.get_pixel(4, 0), None);
    }

    #[test]
    fn crop_produces_new_buffer() {
        let buf = PixelBuffer::from_fn(10, 10, |x, y| [x as u8, y as u8, 0, 255]);
        let cropped = buf.crop(&BoundingBox::new(2, 3, 4, 5)).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (4, 5));
        assert_eq!(cropped.get_pixel(0, 0), Some([2, 3, 0, 255]));
        assert_eq!(cropped.get_pixel(3, 4), Some([5, 7, 0, 255]));
        // 원본은 그대로
        assert_eq!(buf.width(), 10);
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let buf = PixelBuffer::filled(10, 10, [1, 2, 3, 255]);
        let cropped = buf.crop(&BoundingBox::new(8, 8, 10, 10)).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (2, 2));
        assert!(buf.crop(&BoundingBox::new(20, 20, 5, 5)).is_err());
    }

    #[test]
    fn empty_buffer() {
        let buf = PixelBuffer::filled(0, 5, [0, 0, 0, 255]);
        assert!(buf.is_empty());
        assert!(buf.as_raw().is_empty());
    }
}
